//! Filesystem-safe model name tags.

/// Lower-cases `model_name` and collapses every run of non-alphanumeric
/// characters to a single `_`, trimming it from both ends.
///
/// `"meta-llama/Meta-Llama-3-8B-Instruct"` becomes
/// `"meta_llama_meta_llama_3_8b_instruct"`.
pub fn model_tag(model_name: &str) -> String {
    let mut tag = String::with_capacity(model_name.len());
    let mut pending_separator = false;

    for c in model_name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !tag.is_empty() {
                tag.push('_');
            }
            pending_separator = false;
            tag.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separators() {
        assert_eq!(
            model_tag("meta-llama/Meta-Llama-3-8B-Instruct"),
            "meta_llama_meta_llama_3_8b_instruct"
        );
        assert_eq!(model_tag("gpt-3.5-turbo"), "gpt_3_5_turbo");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(model_tag("--gpt 4o--"), "gpt_4o");
    }

    #[test]
    fn separator_only_name_is_empty() {
        assert_eq!(model_tag("./-"), "");
    }
}
