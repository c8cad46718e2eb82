//! Plan compilation and engine serialization through the public API

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reelmix_cli::domain::model::{Clip, Dimensions, ProbedSource, Timeline};
use reelmix_cli::domain::rules::CanvasNormalizer;
use reelmix_cli::engine::{EncodeSettings, EngineCommand};
use reelmix_cli::planner::{GraphCompiler, RenderPlan, SourceResolver};

/// Run the pure stages for a timeline with the given source sizes
fn compile(timeline: &Timeline, sizes: &[(&str, u32, u32)]) -> RenderPlan {
    let staged: HashMap<String, PathBuf> = sizes
        .iter()
        .map(|(r, _, _)| (r.to_string(), PathBuf::from("/work").join(r)))
        .collect();
    let resolved = SourceResolver::resolve(timeline, &staged).unwrap();

    let probed: Vec<ProbedSource> = resolved
        .sources
        .iter()
        .map(|s| {
            let (_, w, h) = sizes.iter().find(|(r, _, _)| *r == s.source_ref).unwrap();
            ProbedSource {
                source: s.clone(),
                dimensions: Dimensions::new(*w, *h).unwrap(),
            }
        })
        .collect();

    let (canvas, videos) = CanvasNormalizer::normalize(&probed).unwrap();
    GraphCompiler::compile(timeline, &resolved, canvas, &videos).unwrap()
}

#[test]
fn test_each_unique_source_is_one_input() {
    let timeline = Timeline::new(
        vec![
            Clip::new("a.mp4", 0.0, 2.0).unwrap(),
            Clip::new("b.mp4", 2.0, 2.0).unwrap(),
            Clip::new("a.mp4", 4.0, 2.0).unwrap(),
            Clip::new("c.mp4", 6.0, 1.0).unwrap(),
            Clip::new("b.mp4", 7.0, 1.0).unwrap(),
        ],
        None,
    )
    .unwrap();

    let plan = compile(
        &timeline,
        &[("a.mp4", 640, 360), ("b.mp4", 1280, 720), ("c.mp4", 720, 1280)],
    );

    assert_eq!(plan.inputs.len(), 3);
    assert_eq!(plan.chains.len(), 5);
    assert_eq!(plan.overlays.len(), 4);
    assert_eq!(plan.canvas, Dimensions::new(1280, 1280).unwrap());
    assert!(plan.inputs.iter().all(|i| i.needs_scaling));
    assert_eq!(plan.input_index_of("c.mp4"), Some(2));
    assert_eq!(plan.total_duration, 8.0);
}

#[test]
fn test_largest_source_is_not_scaled() {
    let timeline = Timeline::new(
        vec![
            Clip::new("hd.mp4", 0.0, 1.0).unwrap(),
            Clip::new("sd.mp4", 1.0, 1.0).unwrap(),
        ],
        None,
    )
    .unwrap();

    let plan = compile(&timeline, &[("hd.mp4", 1920, 1080), ("sd.mp4", 640, 480)]);

    assert!(!plan.inputs[0].needs_scaling);
    assert!(plan.inputs[1].needs_scaling);
}

#[test]
fn test_invocation_ends_with_destination() {
    let timeline = Timeline::new(vec![Clip::new("a.mp4", 1.5, 2.0).unwrap()], None).unwrap();
    let plan = compile(&timeline, &[("a.mp4", 640, 360)]);

    let settings = EncodeSettings {
        preset: "veryfast".to_string(),
        crf: 28,
        ..Default::default()
    };
    let invocation = EngineCommand::new(&settings).build(&plan, Path::new("/out/final.mp4"));

    assert_eq!(invocation.args.last().map(String::as_str), Some("/out/final.mp4"));
    assert!(invocation.args.windows(2).any(|w| w == ["-preset", "veryfast"]));
    assert!(invocation.args.windows(2).any(|w| w == ["-crf", "28"]));
    assert_eq!(
        invocation.filter_graph,
        "[0:v]trim=duration=2,setpts=PTS+1.5/TB[v0]"
    );
    assert_eq!(plan.total_duration, 3.5);
}
