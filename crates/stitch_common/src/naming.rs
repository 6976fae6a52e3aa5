//! Underscore-token helpers for signal names.
//!
//! Every naming convention the generator recognizes (role prefixes, shell
//! interface markers, channel parts) is expressed over the `_`-separated
//! tokens of a signal name, never over raw substrings, so that `awburst`
//! does not look like a reset and `data_input` does not look like a port
//! direction.

/// Splits a signal name into its non-empty `_`-separated tokens.
pub fn tokens(name: &str) -> Vec<&str> {
    name.split('_').filter(|t| !t.is_empty()).collect()
}

/// Returns `true` if the tokens of `marker` appear contiguously in `name`.
///
/// `has_token_run("sh_cl_dma_pcis_awvalid", "dma_pcis")` is `true`, while
/// `has_token_run("sh_cl_dmax_awvalid", "dma")` is `false`.
pub fn has_token_run(name: &str, marker: &str) -> bool {
    let haystack = tokens(name);
    let needle = tokens(marker);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_skip_empty() {
        assert_eq!(tokens("a__b_"), vec!["a", "b"]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn token_run_matches_whole_tokens() {
        assert!(has_token_run("sh_cl_dma_pcis_awvalid", "dma_pcis"));
        assert!(has_token_run("sh_ocl_awvalid", "ocl"));
        assert!(!has_token_run("sh_cl_dmax_awvalid", "dma"));
        assert!(!has_token_run("foo", "foo_bar"));
        assert!(!has_token_run("foo", ""));
    }
}
