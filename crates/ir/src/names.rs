//! Scope helpers over `::`-separated C++ names.

const SCOPE_SEPARATOR: &str = "::";

/// Start of the last separator when splitting left to right, so a `:::`
/// run splits after its first two colons.
fn last_separator(name: &str) -> Option<usize> {
    name.match_indices(SCOPE_SEPARATOR).last().map(|(pos, _)| pos)
}

/// Last segment of a qualified name. `foo::bar` gives `bar`.
///
/// ```
/// assert_eq!(ir::trim_namespace("std::vector::size_type"), "size_type");
/// assert_eq!(ir::trim_namespace("int"), "int");
/// ```
pub fn trim_namespace(name: &str) -> &str {
    match last_separator(name) {
        Some(pos) => &name[pos + SCOPE_SEPARATOR.len()..],
        None => name,
    }
}

/// Everything before the last segment. `std::vector::size_type` gives
/// `std::vector`; unqualified names give an empty string.
pub fn get_namespace(name: &str) -> &str {
    match last_separator(name) {
        Some(pos) => &name[..pos],
        None => "",
    }
}

/// Joins non-empty parts with the scope separator.
pub fn join_scope<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(SCOPE_SEPARATOR)
}
