use crate::config::NormalizationPolicy;

impl NormalizationPolicy {
	/// Applies the policy to a raw technology name.
	///
	/// The result is the string used for the cache key, the catalog lookup,
	/// the matching and the `Tech Name` column alike.
	pub fn apply(&self, raw: &str) -> String {
		match self {
			NormalizationPolicy::Verbatim => raw.to_string(),
			NormalizationPolicy::ReplaceSymbols => raw
				.chars()
				.map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
				.collect::<String>()
				.trim()
				.to_string(),
		}
	}
}
