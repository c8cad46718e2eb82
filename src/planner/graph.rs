//! Filter/overlay graph compilation

use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{Canvas, Clip, SourceVideo, Timeline};
use crate::planner::{
    AudioBinding, ClipChain, FilterNode, OverlayNode, PlanInput, RenderPlan, ResolvedTimeline,
    StreamLabel,
};

/// Pure compiler from a resolved, normalized timeline to a [`RenderPlan`]
pub struct GraphCompiler;

impl GraphCompiler {
    /// Compile a timeline whose sources are resolved and normalized
    ///
    /// `videos` must be in the same order as `resolved.sources`.
    pub fn compile(
        timeline: &Timeline,
        resolved: &ResolvedTimeline,
        canvas: Canvas,
        videos: &[SourceVideo],
    ) -> Result<RenderPlan, DomainError> {
        Self::compile_clips(
            timeline.clips(),
            &resolved.clip_sources,
            canvas,
            videos,
            resolved.audio.clone(),
        )
    }

    /// Compile one chain per clip and chain them through overlays
    ///
    /// `clip_sources[i]` is the position in `videos` of the source clip `i`
    /// plays. Sources are never deduplicated away from clips: two clips on the
    /// same source get two chains reading the same input slot.
    pub fn compile_clips(
        clips: &[Clip],
        clip_sources: &[usize],
        canvas: Canvas,
        videos: &[SourceVideo],
        audio: Option<PathBuf>,
    ) -> Result<RenderPlan, DomainError> {
        if clips.is_empty() {
            return Err(DomainError::Composition("no valid video clips".to_string()));
        }
        if clips.len() != clip_sources.len() {
            return Err(DomainError::Internal(format!(
                "{} clips but {} source assignments",
                clips.len(),
                clip_sources.len()
            )));
        }

        let inputs: Vec<PlanInput> = videos.iter().enumerate().map(PlanInput::from).collect();

        let mut chains = Vec::with_capacity(clips.len());
        for (clip_index, (clip, &source_index)) in clips.iter().zip(clip_sources).enumerate() {
            let video = videos.get(source_index).ok_or_else(|| {
                DomainError::Internal(format!(
                    "clip {} refers to unknown source slot {}",
                    clip_index, source_index
                ))
            })?;
            chains.push(Self::clip_chain(clip_index, source_index, clip, video, canvas));
        }

        let overlays = Self::overlay_chain(chains.len());
        let video_output = overlays
            .last()
            .map(|node| node.output.clone())
            .unwrap_or_else(|| StreamLabel::clip(0));

        let audio = audio.map(|path| AudioBinding {
            input_index: inputs.len(),
            path,
        });

        let total_duration = clips.iter().map(Clip::end_time).fold(0.0_f64, f64::max);

        info!(
            "Compiled {} clip chains over {} inputs, {} overlay nodes, canvas {}",
            chains.len(),
            inputs.len(),
            overlays.len(),
            canvas
        );

        Ok(RenderPlan {
            canvas,
            inputs,
            chains,
            overlays,
            video_output,
            audio,
            total_duration,
        })
    }

    /// trim -> [scale -> pad] -> setpts
    ///
    /// Trim is not checked against the source's own length; a duration past
    /// the end of the source is left for the engine to under-fill.
    fn clip_chain(
        clip_index: usize,
        input_index: usize,
        clip: &Clip,
        video: &SourceVideo,
        canvas: Canvas,
    ) -> ClipChain {
        let mut nodes = vec![FilterNode::Trim {
            duration: clip.duration,
        }];

        if video.needs_scaling {
            debug!(
                "Clip {} ({}) scaled from {} to {}",
                clip_index, video.key, video.dimensions, canvas
            );
            nodes.push(FilterNode::Scale {
                width: canvas.width,
                height: canvas.height,
            });
            nodes.push(FilterNode::Pad {
                width: canvas.width,
                height: canvas.height,
            });
        }

        nodes.push(FilterNode::SetPts {
            offset: clip.start_time,
        });

        ClipChain {
            clip_index,
            input_index,
            nodes,
            output: StreamLabel::clip(clip_index),
        }
    }

    /// Sequential overlays in timeline order: later clips draw on top
    fn overlay_chain(chain_count: usize) -> Vec<OverlayNode> {
        (1..chain_count)
            .map(|i| OverlayNode {
                base: if i == 1 {
                    StreamLabel::clip(0)
                } else {
                    StreamLabel::overlay(i - 1)
                },
                top: StreamLabel::clip(i),
                output: StreamLabel::overlay(i),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Dimensions;

    fn video(key: &str, width: u32, height: u32, needs_scaling: bool) -> SourceVideo {
        SourceVideo {
            key: key.to_string(),
            path: PathBuf::from(format!("/work/{}", key)),
            dimensions: Dimensions::new(width, height).unwrap(),
            needs_scaling,
        }
    }

    fn canvas(width: u32, height: u32) -> Canvas {
        Dimensions::new(width, height).unwrap()
    }

    #[test]
    fn test_single_clip_has_no_overlay() {
        let clips = vec![Clip::new("IMG_0153.mov", 0.0, 5.2).unwrap()];
        let videos = vec![video("IMG_0153.mov", 1280, 720, false)];

        let plan =
            GraphCompiler::compile_clips(&clips, &[0], canvas(1280, 720), &videos, None).unwrap();

        assert!(plan.overlays.is_empty());
        assert_eq!(plan.video_output, StreamLabel::clip(0));
        assert_eq!(plan.total_duration, 5.2);
        assert_eq!(
            plan.chains[0].nodes,
            vec![
                FilterNode::Trim { duration: 5.2 },
                FilterNode::SetPts { offset: 0.0 }
            ]
        );
    }

    #[test]
    fn test_two_sources_scaled_and_overlaid() {
        let clips = vec![
            Clip::new("small.mp4", 0.0, 5.0).unwrap(),
            Clip::new("big.mp4", 5.0, 3.0).unwrap(),
        ];
        let videos = vec![
            video("small.mp4", 640, 480, true),
            video("big.mp4", 1280, 720, false),
        ];

        let plan = GraphCompiler::compile_clips(&clips, &[0, 1], canvas(1280, 720), &videos, None)
            .unwrap();

        assert_eq!(plan.overlays.len(), 1);
        assert_eq!(plan.total_duration, 8.0);
        assert_eq!(
            plan.chains[0].nodes,
            vec![
                FilterNode::Trim { duration: 5.0 },
                FilterNode::Scale { width: 1280, height: 720 },
                FilterNode::Pad { width: 1280, height: 720 },
                FilterNode::SetPts { offset: 0.0 },
            ]
        );
        assert_eq!(plan.chains[1].nodes.len(), 2);
        assert_eq!(plan.video_output, StreamLabel::overlay(1));
    }

    #[test]
    fn test_shared_source_gets_two_chains() {
        let clips = vec![
            Clip::new("a.mp4", 0.0, 4.0).unwrap(),
            Clip::new("a.mp4", 6.0, 2.5).unwrap(),
        ];
        let videos = vec![video("a.mp4", 1920, 1080, false)];

        let plan = GraphCompiler::compile_clips(&clips, &[0, 0], canvas(1920, 1080), &videos, None)
            .unwrap();

        assert_eq!(plan.inputs.len(), 1);
        assert_eq!(plan.chains.len(), 2);
        assert!(plan.chains.iter().all(|c| c.input_index == 0));
        assert_eq!(plan.chains[1].nodes[0], FilterNode::Trim { duration: 2.5 });
        assert_eq!(plan.chains[1].nodes[1], FilterNode::SetPts { offset: 6.0 });
    }

    #[test]
    fn test_overlay_chain_order() {
        let clips: Vec<Clip> = (0..4)
            .map(|i| Clip::new("a.mp4", i as f64, 1.0).unwrap())
            .collect();
        let videos = vec![video("a.mp4", 640, 360, false)];

        let plan =
            GraphCompiler::compile_clips(&clips, &[0, 0, 0, 0], canvas(640, 360), &videos, None)
                .unwrap();

        assert_eq!(plan.overlays.len(), 3);
        assert_eq!(plan.overlays[0].base.as_str(), "v0");
        assert_eq!(plan.overlays[0].top.as_str(), "v1");
        assert_eq!(plan.overlays[1].base.as_str(), "tmp1");
        assert_eq!(plan.overlays[1].top.as_str(), "v2");
        assert_eq!(plan.overlays[2].output.as_str(), "tmp3");
        assert_eq!(plan.video_output.as_str(), "tmp3");
    }

    #[test]
    fn test_audio_binds_after_video_inputs() {
        let clips = vec![
            Clip::new("a.mp4", 0.0, 2.0).unwrap(),
            Clip::new("b.mp4", 2.0, 2.0).unwrap(),
        ];
        let videos = vec![
            video("a.mp4", 640, 360, false),
            video("b.mp4", 640, 360, false),
        ];

        let plan = GraphCompiler::compile_clips(
            &clips,
            &[0, 1],
            canvas(640, 360),
            &videos,
            Some(PathBuf::from("/work/track.mp3")),
        )
        .unwrap();

        let audio = plan.audio.unwrap();
        assert_eq!(audio.input_index, 2);
        assert_eq!(plan.total_duration, 4.0);
    }

    #[test]
    fn test_no_clips_is_composition_error() {
        let err = GraphCompiler::compile_clips(&[], &[], canvas(640, 360), &[], None).unwrap_err();
        assert_eq!(err, DomainError::Composition("no valid video clips".to_string()));
    }

    #[test]
    fn test_duration_past_source_end_passes_through() {
        let clips = vec![Clip::new("short.mp4", 0.0, 3600.0).unwrap()];
        let videos = vec![video("short.mp4", 640, 360, false)];

        let plan =
            GraphCompiler::compile_clips(&clips, &[0], canvas(640, 360), &videos, None).unwrap();

        assert_eq!(plan.chains[0].nodes[0], FilterNode::Trim { duration: 3600.0 });
        assert_eq!(plan.total_duration, 3600.0);
    }
}
