#[cfg(test)]
mod cli {
    use pbr_ibl::core::pbrt::Float;
    use pbr_ibl::core::geometry::point::Point2i;
    use pbr_ibl::core::imageio::write_image;
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use std::process::{Command, Output};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pbr_ibl_cli_{}_{}", std::process::id(), name))
    }

    fn run(args: &[&OsStr]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pbr-hdr-environment"))
            .args(args)
            .output()
            .expect("binary runs")
    }

    #[test]
    fn missing_input_prints_usage() {
        let out = run(&[]);

        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
    }

    #[test]
    fn unreadable_input_fails() {
        let out = run(&[temp_path("missing.hdr").as_os_str()]);
        assert_eq!(out.status.code(), Some(1));

        let path = temp_path("garbage.hdr");
        std::fs::write(&path, b"this is a text file, not radiance").expect("write");
        let out = run(&[path.as_os_str(), OsStr::new("-q")]);
        std::fs::remove_file(&path).ok();

        assert_eq!(out.status.code(), Some(1));
    }

    #[test]
    fn render_exit_codes() {
        let path = temp_path("sky.hdr");
        let res = Point2i::new(8, 4);
        let rgb = (0..8 * 4)
            .flat_map(|i| {
                let v = if i < 16 { 2.0 } else { 0.25 as Float };
                vec![v, v, v]
            })
            .collect::<Vec<Float>>();
        write_image(&path, &rgb, &res).expect("environment written");

        // Nothing to compare against
        let out = run(&[path.as_os_str(), OsStr::new("--quick"), OsStr::new("-q")]);
        assert_eq!(out.status.code(), Some(0));

        // A baseline that does not exist fails the regression test
        let dir = temp_path("artifacts");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let baseline = dir.join("TestPBRHdrEnvironment.png");
        let out = run(&[
            path.as_os_str(), OsStr::new("--quick"), OsStr::new("-q"),
            OsStr::new("-V"), baseline.as_os_str(),
            OsStr::new("-T"), dir.as_os_str()]);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(out.status.code(), Some(1));
    }
}
