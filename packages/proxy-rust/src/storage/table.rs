//! A delegate repository defined by an explicit method table.

use std::fmt;

use anyhow::anyhow;
use multirepo_core::TypedValue;

use crate::interface::{InterfaceDescriptor, MethodSignature};
use crate::traits::Repository;

/// Executes one method of a [`TableRepository`].
pub type MethodHandler =
    Box<dyn Fn(Vec<TypedValue>) -> anyhow::Result<Option<TypedValue>> + Send + Sync>;

/// Maps each declared signature to a handler closure.
pub struct TableRepository {
    capability: InterfaceDescriptor,
    // Index-aligned with `capability.methods()`.
    handlers: Vec<MethodHandler>,
}

impl TableRepository {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            capability: InterfaceDescriptor::new(name),
            handlers: Vec::new(),
        }
    }

    /// Adds `signature` served by `handler`, replacing the handler of an
    /// existing method with the same name and parameters.
    #[must_use]
    pub fn with_method<F>(mut self, signature: MethodSignature, handler: F) -> Self
    where
        F: Fn(Vec<TypedValue>) -> anyhow::Result<Option<TypedValue>> + Send + Sync + 'static,
    {
        self.add_method(signature, handler);
        self
    }

    pub fn add_method<F>(&mut self, signature: MethodSignature, handler: F)
    where
        F: Fn(Vec<TypedValue>) -> anyhow::Result<Option<TypedValue>> + Send + Sync + 'static,
    {
        let index = self.capability.add_method(signature);
        if index == self.handlers.len() {
            self.handlers.push(Box::new(handler));
        } else {
            self.handlers[index] = Box::new(handler);
        }
    }
}

impl Repository for TableRepository {
    fn name(&self) -> &str {
        self.capability.name()
    }

    fn capability(&self) -> &InterfaceDescriptor {
        &self.capability
    }

    fn invoke(
        &self,
        method: &MethodSignature,
        args: Vec<TypedValue>,
    ) -> anyhow::Result<Option<TypedValue>> {
        let handler = self
            .capability
            .position(method)
            .and_then(|index| self.handlers.get(index))
            .ok_or_else(|| anyhow!("`{}` has no handler for `{method}`", self.name()))?;
        handler(args)
    }
}

impl fmt::Debug for TableRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRepository")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo() -> TableRepository {
        TableRepository::new("echo")
            .with_method(MethodSignature::new("echo").generic_param(), |mut args| {
                Ok(args.pop())
            })
            .with_method(MethodSignature::new("ping").returns::<String>(), |_| {
                Ok(Some(TypedValue::of(&"pong".to_string())?))
            })
    }

    #[test]
    fn dispatches_to_matching_handler() {
        let repository = echo();
        let ping = repository.capability().find("ping", &[]).unwrap().clone();
        let pong = repository.invoke(&ping, Vec::new()).unwrap().unwrap();
        assert_eq!(pong.decode::<String>().unwrap(), "pong");

        let echo = repository.capability().methods()[0].clone();
        let value = TypedValue::of(&5u8).unwrap();
        assert_eq!(repository.invoke(&echo, vec![value.clone()]).unwrap(), Some(value));
    }

    #[test]
    fn re_adding_signature_replaces_handler() {
        let repository = echo().with_method(MethodSignature::new("ping").returns::<String>(), |_| {
            Ok(Some(TypedValue::of(&"PONG".to_string())?))
        });
        assert_eq!(repository.capability().methods().len(), 2);

        let ping = MethodSignature::new("ping").returns::<String>();
        let pong = repository.invoke(&ping, Vec::new()).unwrap().unwrap();
        assert_eq!(pong.decode::<String>().unwrap(), "PONG");
    }

    #[test]
    fn unknown_signature_fails() {
        let err = echo()
            .invoke(&MethodSignature::new("ping").param::<u8>(), Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "`echo` has no handler for `ping(u8)`");
    }
}
