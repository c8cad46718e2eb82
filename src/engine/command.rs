//! Serialization of a render plan into an ffmpeg argument vector

use std::path::Path;

use crate::engine::{EncodeSettings, EngineInvocation};
use crate::planner::{ClipChain, FilterNode, OverlayNode, RenderPlan};

/// Builds the engine's textual program from a typed plan
pub struct EngineCommand<'a> {
    settings: &'a EncodeSettings,
}

impl<'a> EngineCommand<'a> {
    pub fn new(settings: &'a EncodeSettings) -> Self {
        Self { settings }
    }

    /// Global options, inputs, audio input, filter graph, maps, encoding, destination
    pub fn build(&self, plan: &RenderPlan, output_path: &Path) -> EngineInvocation {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-hwaccel".into(),
            self.settings.hwaccel.clone(),
        ];

        for input in &plan.inputs {
            args.push("-i".into());
            args.push(input.path.to_string_lossy().into_owned());
        }
        if let Some(audio) = &plan.audio {
            args.push("-i".into());
            args.push(audio.path.to_string_lossy().into_owned());
        }

        let filter_graph = filter_graph(plan);
        args.push("-filter_complex".into());
        args.push(filter_graph.clone());
        args.push("-map".into());
        args.push(format!("[{}]", plan.video_output));

        if let Some(audio) = &plan.audio {
            args.push("-map".into());
            args.push(format!("{}:a", audio.input_index));
            args.push("-t".into());
            args.push(plan.total_duration.to_string());
        }

        args.extend([
            "-c:v".to_string(),
            self.settings.video_codec.clone(),
            "-preset".to_string(),
            self.settings.preset.clone(),
            "-crf".to_string(),
            self.settings.crf.to_string(),
            "-threads".to_string(),
            self.settings.threads.to_string(),
            "-c:a".to_string(),
            self.settings.audio_codec.clone(),
            "-b:a".to_string(),
            self.settings.audio_bitrate.clone(),
            "-shortest".to_string(),
            output_path.to_string_lossy().into_owned(),
        ]);

        EngineInvocation {
            args,
            filter_graph,
            output_path: output_path.to_path_buf(),
        }
    }
}

/// Whole `-filter_complex` program: every clip chain, then the overlays
pub fn filter_graph(plan: &RenderPlan) -> String {
    plan.chains
        .iter()
        .map(chain_expression)
        .chain(plan.overlays.iter().map(overlay_expression))
        .collect::<Vec<_>>()
        .join(";")
}

fn chain_expression(chain: &ClipChain) -> String {
    let filters = chain
        .nodes
        .iter()
        .map(node_expression)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}:v]{}[{}]", chain.input_index, filters, chain.output)
}

fn node_expression(node: &FilterNode) -> String {
    match node {
        FilterNode::Trim { duration } => format!("trim=duration={}", duration),
        FilterNode::Scale { width, height } => {
            format!("scale={}:{}:force_original_aspect_ratio=decrease", width, height)
        }
        FilterNode::Pad { width, height } => {
            format!("pad={}:{}:(ow-iw)/2:(oh-ih)/2", width, height)
        }
        FilterNode::SetPts { offset } => format!("setpts=PTS+{}/TB", offset),
    }
}

fn overlay_expression(node: &OverlayNode) -> String {
    format!("[{}][{}]overlay[{}]", node.base, node.top, node.output)
}
