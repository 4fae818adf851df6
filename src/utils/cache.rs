use std::path::PathBuf;

pub fn symptomatch_cache_dir() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("symptomatch"),
        None => std::env::temp_dir().join("symptomatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::symptomatch_cache_dir;

    #[test]
    fn cache_dir_is_namespaced() {
        assert!(symptomatch_cache_dir().ends_with("symptomatch"));
    }
}
