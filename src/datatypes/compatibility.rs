use std::rc::Rc;
use std::sync::Arc;

/// The host-supplied datatype hierarchy the acceptance check queries.
///
/// Implementors only need to answer [`is_subtype`](Self::is_subtype); the
/// provided [`is_compatible`](Self::is_compatible) lifts it to the set-level
/// question asked for every candidate connection.
pub trait DatatypeCompatibility {
    /// `true` when data of type `child` may be used wherever `parent` is declared.
    fn is_subtype(&self, child: &str, parent: &str) -> bool;

    /// `true` when any candidate datatype, or the forced datatype, is a
    /// subtype of any required datatype.
    fn is_compatible(
        &self,
        candidates: &[String],
        required: &[String],
        force_datatype: Option<&str>,
    ) -> bool {
        candidates
            .iter()
            .map(String::as_str)
            .chain(force_datatype)
            .any(|candidate| {
                required
                    .iter()
                    .any(|parent| self.is_subtype(candidate, parent))
            })
    }
}

impl<T: DatatypeCompatibility + ?Sized> DatatypeCompatibility for &T {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        (**self).is_subtype(child, parent)
    }
}

impl<T: DatatypeCompatibility + ?Sized> DatatypeCompatibility for Box<T> {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        (**self).is_subtype(child, parent)
    }
}

impl<T: DatatypeCompatibility + ?Sized> DatatypeCompatibility for Rc<T> {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        (**self).is_subtype(child, parent)
    }
}

impl<T: DatatypeCompatibility + ?Sized> DatatypeCompatibility for Arc<T> {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        (**self).is_subtype(child, parent)
    }
}

/// Oracle that only accepts identical datatypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDatatypes;

impl DatatypeCompatibility for ExactDatatypes {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        child == parent
    }
}
