/// Language used when the request omits `from`
pub const DEFAULT_SOURCE: &str = "auto";
/// Language used when the request omits `to`
pub const DEFAULT_TARGET: &str = "en";

/// Build the single instruction sent upstream.
///
/// `from`, `to` and `text` are embedded verbatim; the model is asked for the
/// translation alone so its reply can be returned to the client untouched.
pub fn build_translation_prompt(from: &str, to: &str, text: &str) -> String {
    format!(
        "Translate the following text from {} to {}: {}. give me the translation only, without any additional text.",
        from, to, text
    )
}
