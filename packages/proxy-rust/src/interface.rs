//! Method tables describing a declared interface or a delegate's capability.
//!
//! The proxy never inspects Rust traits at runtime. Every interface it
//! implements, and every delegate repository it calls, is described by an
//! explicit [`InterfaceDescriptor`]: a named list of [`MethodSignature`]s.

use std::fmt;

use multirepo_core::{TypeKey, TypedValue};

// ---------------------------------------------------------------------------
// ParamType
// ---------------------------------------------------------------------------

/// Declared type of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Exactly this type.
    Exact(TypeKey),
    /// Any type, like the entity parameter of a conventional `save(S)`.
    Generic,
}

impl ParamType {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Exact(TypeKey::of::<T>())
    }

    /// Whether a parameter declared as `self` can receive what the source
    /// method declared as `source`.
    #[must_use]
    pub fn accepts(&self, source: &ParamType) -> bool {
        match (self, source) {
            (Self::Generic, _) => true,
            (Self::Exact(own), Self::Exact(other)) => own == other,
            (Self::Exact(_), Self::Generic) => false,
        }
    }

    /// Whether a runtime argument of type `ty` fits this parameter.
    #[must_use]
    pub fn admits(&self, ty: TypeKey) -> bool {
        match self {
            Self::Generic => true,
            Self::Exact(own) => *own == ty,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(ty) => f.write_str(ty.simple_name()),
            Self::Generic => f.write_str("_"),
        }
    }
}

// ---------------------------------------------------------------------------
// MethodSignature
// ---------------------------------------------------------------------------

/// Name, parameter types and return type of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    params: Vec<ParamType>,
    returns: Option<TypeKey>,
}

impl MethodSignature {
    /// A method taking no parameters and returning nothing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Appends a parameter of exactly type `T`.
    #[must_use]
    pub fn param<T: ?Sized + 'static>(mut self) -> Self {
        self.params.push(ParamType::of::<T>());
        self
    }

    /// Appends a parameter accepting any type.
    #[must_use]
    pub fn generic_param(mut self) -> Self {
        self.params.push(ParamType::Generic);
        self
    }

    /// Sets the declared return type.
    #[must_use]
    pub fn returns<T: ?Sized + 'static>(mut self) -> Self {
        self.returns = Some(TypeKey::of::<T>());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[must_use]
    pub fn return_type(&self) -> Option<TypeKey> {
        self.returns
    }

    /// Same name, and every own parameter accepts the corresponding source
    /// parameter.
    #[must_use]
    pub fn matches(&self, name: &str, params: &[ParamType]) -> bool {
        self.name == name
            && self.params.len() == params.len()
            && self
                .params
                .iter()
                .zip(params)
                .all(|(own, source)| own.accepts(source))
    }

    /// Same name, and every argument's runtime type fits its parameter.
    #[must_use]
    pub fn admits(&self, name: &str, args: &[TypedValue]) -> bool {
        self.name == name
            && self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| param.admits(arg.ty()))
    }

    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, render_params(&self.params))?;
        if let Some(returns) = self.returns {
            write!(f, " -> {}", returns.simple_name())?;
        }
        Ok(())
    }
}

/// Comma-separated parameter list, as used in signatures and error messages.
#[must_use]
pub fn render_params(params: &[ParamType]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// InterfaceDescriptor
// ---------------------------------------------------------------------------

/// A named set of method signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    name: String,
    methods: Vec<MethodSignature>,
}

impl InterfaceDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Adds `method`, replacing any method with the same name and parameters.
    #[must_use]
    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.add_method(method);
        self
    }

    /// In-place form of [`with_method`](Self::with_method). Returns the
    /// method's position.
    pub fn add_method(&mut self, method: MethodSignature) -> usize {
        if let Some(index) = self.position(&method) {
            self.methods[index] = method;
            index
        } else {
            self.methods.push(method);
            self.methods.len() - 1
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// Position of the method with the same name and parameters as `method`.
    #[must_use]
    pub fn position(&self, method: &MethodSignature) -> Option<usize> {
        self.methods.iter().position(|own| own.same_key(method))
    }

    /// The method equivalent to a source method `name(params)`.
    #[must_use]
    pub fn find(&self, name: &str, params: &[ParamType]) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| method.matches(name, params))
    }

    /// The method a call `name(args)` resolves to.
    #[must_use]
    pub fn resolve(&self, name: &str, args: &[TypedValue]) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| method.admits(name, args))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Customer;
    struct CustomerRow;

    fn customers() -> InterfaceDescriptor {
        InterfaceDescriptor::new("CustomerRepository")
            .with_method(MethodSignature::new("save").param::<Customer>())
            .with_method(
                MethodSignature::new("findById")
                    .param::<u64>()
                    .returns::<Customer>(),
            )
            .with_method(MethodSignature::new("findById").param::<String>())
    }

    #[test]
    fn generic_parameter_accepts_any_source_type() {
        assert!(ParamType::Generic.accepts(&ParamType::of::<Customer>()));
        assert!(ParamType::Generic.accepts(&ParamType::Generic));
        assert!(!ParamType::of::<CustomerRow>().accepts(&ParamType::of::<Customer>()));
        assert!(!ParamType::of::<Customer>().accepts(&ParamType::Generic));
        assert!(ParamType::of::<u64>().accepts(&ParamType::of::<u64>()));
    }

    #[test]
    fn find_matches_name_and_parameter_types() {
        let descriptor = customers();
        let found = descriptor
            .find("findById", &[ParamType::of::<u64>()])
            .unwrap();
        assert_eq!(found.return_type(), Some(TypeKey::of::<Customer>()));

        assert!(descriptor.find("findById", &[ParamType::of::<u32>()]).is_none());
        assert!(descriptor.find("findById", &[]).is_none());
        assert!(descriptor.find("delete", &[ParamType::of::<u64>()]).is_none());
    }

    #[test]
    fn resolve_selects_overload_by_argument_type() {
        let descriptor = customers();
        let by_text = [TypedValue::of(&"c-1".to_string()).unwrap()];
        let by_number = [TypedValue::of(&7u64).unwrap()];

        let text = descriptor.resolve("findById", &by_text).unwrap();
        assert_eq!(text.params(), &[ParamType::of::<String>()]);
        let number = descriptor.resolve("findById", &by_number).unwrap();
        assert_eq!(number.params(), &[ParamType::of::<u64>()]);
        assert!(descriptor
            .resolve("findById", &[TypedValue::of(&true).unwrap()])
            .is_none());
    }

    #[test]
    fn with_method_replaces_same_signature() {
        let descriptor = customers().with_method(
            MethodSignature::new("save")
                .param::<Customer>()
                .returns::<u64>(),
        );
        assert_eq!(descriptor.methods().len(), 3);
        let save = descriptor.find("save", &[ParamType::of::<Customer>()]).unwrap();
        assert_eq!(save.return_type(), Some(TypeKey::of::<u64>()));
    }

    #[test]
    fn signature_display() {
        let signature = MethodSignature::new("saveAll")
            .generic_param()
            .param::<u64>()
            .returns::<bool>();
        assert_eq!(signature.to_string(), "saveAll(_, u64) -> bool");
        assert_eq!(MethodSignature::new("deleteAll").to_string(), "deleteAll()");
    }
}
