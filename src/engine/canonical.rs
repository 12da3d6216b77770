/// Builds the `"Last, First"` join key for a roster student. Fields are used verbatim.
pub fn canonical_name(first_name: &str, last_name: &str) -> String {
    format!("{last_name}, {first_name}")
}
