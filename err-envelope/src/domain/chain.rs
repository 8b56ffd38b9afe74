//! Walking chains of failures.
//!
//! Rust errors expose a single `source()` link. [`Joined`] bundles several
//! independent failures so that a chain can fan out; [`walk_chain`] visits
//! both kinds of link depth-first.
//!
//! `io::Error::source()` skips the custom error it wraps, so the walk steps
//! into [`io::Error::get_ref`] instead.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use super::error::BoxError;

/// Several failures reported together.
///
/// # Examples
/// ```
/// use err_envelope::domain::{BoxError, ContextError, Joined};
///
/// let joined = Joined::new(vec![
///     Box::new(std::io::Error::other("flush failed")) as BoxError,
///     Box::new(ContextError::DeadlineExceeded),
/// ]);
/// assert_eq!(joined.errors().len(), 2);
/// assert_eq!(joined.to_string(), "flush failed\ncontext deadline exceeded");
/// ```
#[derive(Debug)]
pub struct Joined {
    errors: Vec<BoxError>,
}

impl Joined {
    /// Bundle `errors` together, preserving their order.
    #[must_use]
    pub const fn new(errors: Vec<BoxError>) -> Self {
        Self { errors }
    }

    /// The bundled failures.
    #[must_use]
    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }
}

impl fmt::Display for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl StdError for Joined {}

/// Visit `root` and every failure reachable from it until `visit` returns
/// `true`.
///
/// Returns whether any visit matched.
pub fn walk_chain<F>(root: &(dyn StdError + 'static), mut visit: F) -> bool
where
    F: FnMut(&(dyn StdError + 'static)) -> bool,
{
    walk(root, &mut visit)
}

fn walk<F>(node: &(dyn StdError + 'static), visit: &mut F) -> bool
where
    F: FnMut(&(dyn StdError + 'static)) -> bool,
{
    let mut current = Some(node);
    while let Some(link) = current {
        if visit(link) {
            return true;
        }
        if let Some(joined) = link.downcast_ref::<Joined>() {
            return joined
                .errors()
                .iter()
                .any(|member| walk(member.as_ref(), visit));
        }
        current = next_link(link);
    }
    false
}

fn next_link<'a>(link: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    link.downcast_ref::<io::Error>()
        .and_then(io::Error::get_ref)
        .map(|inner| inner as &(dyn StdError + 'static))
        .or_else(|| link.source())
}

/// Return the first failure reachable from `root` that is a `T`.
pub fn find_in_chain<'a, T>(root: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    let mut found = None;
    find(root, &mut found);
    found
}

fn find<'a, T>(node: &'a (dyn StdError + 'static), found: &mut Option<&'a T>) -> bool
where
    T: StdError + 'static,
{
    let mut current = Some(node);
    while let Some(link) = current {
        if let Some(hit) = link.downcast_ref::<T>() {
            *found = Some(hit);
            return true;
        }
        if let Some(joined) = link.downcast_ref::<Joined>() {
            return joined
                .errors()
                .iter()
                .any(|member| find(member.as_ref(), found));
        }
        current = next_link(link);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[rstest]
    fn walk_follows_source_links() {
        let outer = Outer(std::io::Error::from(std::io::ErrorKind::NotFound));
        let mut seen = Vec::new();
        let matched = walk_chain(&outer, |link| {
            seen.push(link.to_string());
            false
        });
        assert!(!matched);
        assert_eq!(seen, vec!["outer".to_owned(), "entity not found".to_owned()]);
    }

    #[rstest]
    fn walk_descends_into_joined_members() {
        let joined = Joined::new(vec![
            Box::new(std::io::Error::other("first")) as BoxError,
            Box::new(Outer(std::io::Error::other("nested"))),
        ]);
        let matched = walk_chain(&joined, |link| link.to_string() == "nested");
        assert!(matched);
    }

    #[rstest]
    fn find_returns_typed_reference() {
        let outer = Outer(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        let io = find_in_chain::<std::io::Error>(&outer).expect("io error in chain");
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
    }

    #[rstest]
    fn walk_steps_into_custom_io_errors() {
        let timed_out = std::io::Error::from(std::io::ErrorKind::TimedOut);
        let wrapped = std::io::Error::other(Outer(timed_out));
        let mut seen = Vec::new();
        walk_chain(&wrapped, |link| {
            seen.push(link.to_string());
            false
        });
        assert_eq!(
            seen,
            vec!["outer".to_owned(), "outer".to_owned(), "timed out".to_owned()]
        );
    }

    #[rstest]
    fn find_reaches_through_io_other() {
        let wrapped = std::io::Error::other(Outer(std::io::Error::other("deepest")));
        let outer = find_in_chain::<Outer>(&wrapped).expect("custom error is reachable");
        assert_eq!(outer.0.to_string(), "deepest");
    }

    #[rstest]
    fn find_misses_absent_types() {
        let io = std::io::Error::other("plain");
        assert!(find_in_chain::<Outer>(&io).is_none());
    }
}
