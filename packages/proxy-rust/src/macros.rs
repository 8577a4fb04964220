//! Typed facades over [`InvocationRouter`](crate::InvocationRouter).

/// Declares a multi-repository interface as a typed struct.
///
/// Each `fn` line becomes a method that encodes its arguments, routes the
/// call through the interface's router under the quoted wire name, and
/// decodes the result. Methods with a return type yield
/// `Result<Option<T>, InvocationError>`; methods without one yield
/// `Result<(), InvocationError>`. The struct also implements
/// [`MultiRepository`](crate::MultiRepository), so setup can install it and
/// [`RouterDirectory::resolve`](crate::RouterDirectory::resolve) can hand it
/// out.
///
/// ```
/// use multirepo_proxy::{multi_repository, MultiRepository};
///
/// multi_repository! {
///     /// Orders, fanned out to every order store.
///     pub struct OrderRepository {
///         fn save(order: String) => "save";
///         fn find_by_id(id: u64) -> String => "findById";
///     }
/// }
///
/// let descriptor = OrderRepository::descriptor();
/// assert_eq!(descriptor.name(), "OrderRepository");
/// assert_eq!(descriptor.methods().len(), 2);
/// ```
#[macro_export]
macro_rules! multi_repository {
    (@method [$($fmeta:tt)*] $method:ident $wire:literal ( $( $arg:ident : $arg_ty:ty ),* ) -> $ret:ty) => {
        $($fmeta)*
        #[allow(clippy::missing_errors_doc)]
        pub fn $method(
            &self
            $(, $arg: &$arg_ty)*
        ) -> ::std::result::Result<::std::option::Option<$ret>, $crate::InvocationError> {
            let args = ::std::vec![$($crate::TypedValue::of($arg)?),*];
            match self.router.invoke($wire, args)? {
                ::std::option::Option::Some(value) => {
                    ::std::result::Result::Ok(::std::option::Option::Some(value.decode::<$ret>()?))
                }
                ::std::option::Option::None => ::std::result::Result::Ok(::std::option::Option::None),
            }
        }
    };

    (@method [$($fmeta:tt)*] $method:ident $wire:literal ( $( $arg:ident : $arg_ty:ty ),* )) => {
        $($fmeta)*
        #[allow(clippy::missing_errors_doc)]
        pub fn $method(
            &self
            $(, $arg: &$arg_ty)*
        ) -> ::std::result::Result<(), $crate::InvocationError> {
            let args = ::std::vec![$($crate::TypedValue::of($arg)?),*];
            self.router.invoke($wire, args)?;
            ::std::result::Result::Ok(())
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                fn $method:ident ( $( $arg:ident : $arg_ty:ty ),* $(,)? ) $( -> $ret:ty )? => $wire:literal ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $name {
            router: ::std::sync::Arc<$crate::InvocationRouter>,
        }

        impl $name {
            $(
                $crate::multi_repository!(
                    @method [$(#[$fmeta])*] $method $wire ( $( $arg : $arg_ty ),* ) $( -> $ret )?
                );
            )*

            /// Router serving this interface.
            #[must_use]
            pub fn router(&self) -> &::std::sync::Arc<$crate::InvocationRouter> {
                &self.router
            }
        }

        impl $crate::MultiRepository for $name {
            const NAME: &'static str = ::std::stringify!($name);

            fn descriptor() -> $crate::InterfaceDescriptor {
                $crate::InterfaceDescriptor::new(::std::stringify!($name))
                    $(
                        .with_method(
                            $crate::MethodSignature::new($wire)
                                $( .param::<$arg_ty>() )*
                                $( .returns::<$ret>() )?
                        )
                    )*
            }

            fn from_router(router: ::std::sync::Arc<$crate::InvocationRouter>) -> Self {
                Self { router }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&*self.router, f)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(::std::stringify!($name))
                    .field("router", &*self.router)
                    .finish()
            }
        }
    };
}
