#[cfg(test)]
mod fileutil {
    use pbr_ibl::core::fileutil::{has_extension, has_extension_ci, indexed_sibling, file_stem_or};
    use std::path::PathBuf;

    #[test]
    fn has_extention() {
        assert!(has_extension("foo.exr", "exr"));
        assert!(has_extension("foo.png", "png"));
        assert!(has_extension("foo.hdr", "hdr"));
        assert!(has_extension("foo.pfm", "pfm"));
        assert!(!has_extension("foo.HDR", "hdr"));
        assert!(has_extension_ci("foo.HDR", "hdr"));
        assert!(!has_extension_ci("foo", "hdr"));
    }

    #[test]
    fn alternate_baselines() {
        assert_eq!(indexed_sibling("valid/Test.png", 0), PathBuf::from("valid/Test.png"));
        assert_eq!(indexed_sibling("valid/Test.png", 1), PathBuf::from("valid/Test_1.png"));
        assert_eq!(indexed_sibling("valid/Test.png", 12), PathBuf::from("valid/Test_12.png"));
        assert_eq!(indexed_sibling("Test", 2), PathBuf::from("Test_2"));
    }

    #[test]
    fn stems() {
        assert_eq!(file_stem_or("valid/TestPBR.png", "x"), "TestPBR");
        assert_eq!(file_stem_or("", "x"), "x");
    }
}
