// Unit tests for business rules

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::domain::model::*;
    use crate::domain::rules::*;

    fn probed(key: &str, width: u32, height: u32) -> ProbedSource {
        ProbedSource {
            source: StagedSource {
                key: key.to_string(),
                source_ref: format!("videos/{}", key),
                path: PathBuf::from(format!("/work/{}", key)),
            },
            dimensions: Dimensions::new(width, height).unwrap(),
        }
    }

    #[test]
    fn test_source_key_uses_final_component() {
        assert_eq!(source_key("videos/test_user/file1.mp4"), "file1.mp4");
        assert_eq!(source_key("file1.mp4"), "file1.mp4");
        assert_eq!(source_key("videos\\clip.mov"), "clip.mov");
        assert_eq!(source_key("videos/dir/"), "dir");
    }

    #[test]
    fn test_canvas_is_elementwise_max() {
        let sources = vec![probed("a.mp4", 640, 480), probed("b.mp4", 480, 720)];
        let canvas = CanvasNormalizer::canvas(&sources).unwrap();
        assert_eq!(canvas, Dimensions::new(640, 720).unwrap());
    }

    #[test]
    fn test_canvas_independent_of_order() {
        let forward = vec![
            probed("a.mp4", 640, 480),
            probed("b.mp4", 1280, 720),
            probed("c.mp4", 720, 1280),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            CanvasNormalizer::canvas(&forward).unwrap(),
            CanvasNormalizer::canvas(&reversed).unwrap()
        );
    }

    #[test]
    fn test_canvas_of_nothing_is_composition_error() {
        let err = CanvasNormalizer::canvas(&[]).unwrap_err();
        assert_eq!(err.kind(), "composition_error");
    }

    #[test]
    fn test_needs_scaling_flags() {
        let sources = vec![probed("small.mp4", 640, 480), probed("big.mp4", 1280, 720)];
        let (canvas, videos) = CanvasNormalizer::normalize(&sources).unwrap();

        assert_eq!(canvas, Dimensions::new(1280, 720).unwrap());
        assert!(videos[0].needs_scaling);
        assert!(!videos[1].needs_scaling);
        assert_eq!(videos[0].key, "small.mp4");
    }

    #[test]
    fn test_scaling_when_only_one_axis_smaller() {
        let sources = vec![probed("wide.mp4", 1920, 800), probed("tall.mp4", 1080, 1080)];
        let (canvas, videos) = CanvasNormalizer::normalize(&sources).unwrap();

        assert_eq!(canvas, Dimensions::new(1920, 1080).unwrap());
        assert!(videos.iter().all(|v| v.needs_scaling));
    }

    #[test]
    fn test_identical_sources_never_scaled() {
        let sources = vec![probed("a.mp4", 1280, 720), probed("b.mp4", 1280, 720)];
        let (_, videos) = CanvasNormalizer::normalize(&sources).unwrap();
        assert!(videos.iter().all(|v| !v.needs_scaling));
    }
}
