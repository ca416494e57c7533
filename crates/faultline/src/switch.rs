// Switch dispatch
// First-match selection among candidate types or traits

use std::error::Error as StdError;

use crate::conversion::cast;
use crate::traits::Trait;
use crate::types::ErrorType;

/// Outcome of [`type_switch`] and [`trait_switch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCase<T> {
    /// There was no error to classify.
    NoError,
    /// The first candidate, in argument order, that matched.
    Matched(T),
    /// There was an error but no candidate matched it.
    NotRecognised,
}

impl<T> SwitchCase<T> {
    pub fn matched(self) -> Option<T> {
        match self {
            SwitchCase::Matched(value) => Some(value),
            _ => None,
        }
    }
}

/// Return the first of `candidates` that `err` is of.
///
/// Candidates are tried in order, with no ranking by specificity: list
/// subtypes before their supertypes to prefer the more specific match.
///
/// ```
/// use faultline::{type_switch, SwitchCase, common::{ILLEGAL_STATE, INTERNAL_ERROR}};
///
/// let err = INTERNAL_ERROR.new("boom");
/// match type_switch(Some(&err), &[&ILLEGAL_STATE, &INTERNAL_ERROR]) {
///     SwitchCase::Matched(t) => assert_eq!(t, &*INTERNAL_ERROR),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn type_switch<'t>(
    err: Option<&(dyn StdError + 'static)>,
    candidates: &[&'t ErrorType],
) -> SwitchCase<&'t ErrorType> {
    dispatch(err, candidates, |typed, candidate| typed.is_of_type(candidate))
}

/// Return the first of `candidates` that `err` has.
pub fn trait_switch<'t>(
    err: Option<&(dyn StdError + 'static)>,
    candidates: &[&'t Trait],
) -> SwitchCase<&'t Trait> {
    dispatch(err, candidates, |typed, candidate| typed.has_trait(candidate))
}

fn dispatch<'t, C>(
    err: Option<&(dyn StdError + 'static)>,
    candidates: &[&'t C],
    matches: impl Fn(&crate::error::Error, &C) -> bool,
) -> SwitchCase<&'t C> {
    let Some(err) = err else {
        return SwitchCase::NoError;
    };
    let Some(typed) = cast(err) else {
        return SwitchCase::NotRecognised;
    };

    candidates
        .iter()
        .copied()
        .find(|candidate| matches(typed, *candidate))
        .map_or(SwitchCase::NotRecognised, SwitchCase::Matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespace;
    use crate::traits::{NOT_FOUND, TIMEOUT};

    #[test]
    fn first_match_wins() {
        let ns = Namespace::new("switch", &[]);
        let base = ns.new_type("base", &[]);
        let derived = base.new_subtype("derived", &[]);
        let other = ns.new_type("other", &[]);
        let err = derived.new("x");

        assert_eq!(type_switch(Some(&err), &[&base, &derived]), SwitchCase::Matched(&base));
        assert_eq!(type_switch(Some(&err), &[&derived, &base]), SwitchCase::Matched(&derived));
        assert_eq!(type_switch(Some(&err), &[&other]), SwitchCase::NotRecognised);
        assert_eq!(type_switch(Some(&err), &[]), SwitchCase::NotRecognised);
    }

    #[test]
    fn no_error_and_foreign() {
        let ns = Namespace::new("switch_edge", &[]);
        let kind = ns.new_type("kind", &[]);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "io");

        assert_eq!(type_switch(None, &[&kind]), SwitchCase::NoError);
        assert_eq!(type_switch(Some(&io), &[&kind]), SwitchCase::NotRecognised);
        assert_eq!(trait_switch(None, &[&TIMEOUT]), SwitchCase::NoError);
        assert_eq!(trait_switch(Some(&io), &[&TIMEOUT]), SwitchCase::NotRecognised);
    }

    #[test]
    fn traits_in_order() {
        let ns = Namespace::new("switch_traits", &[&TIMEOUT]);
        let kind = ns.new_type("kind", &[&NOT_FOUND]);
        let err = kind.new("x");

        assert_eq!(
            trait_switch(Some(&err), &[&NOT_FOUND, &TIMEOUT]).matched(),
            Some(&*NOT_FOUND)
        );
        assert_eq!(
            trait_switch(Some(&err), &[&TIMEOUT, &NOT_FOUND]).matched(),
            Some(&*TIMEOUT)
        );
    }
}
