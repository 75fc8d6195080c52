//! Debug overlay as data.
//!
//! Detection never touches the frame. [`draw_commands`] describes what a
//! debug view should show and a renderer elsewhere paints it.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::resolver::{DetectionResult, Region};

pub const CANDIDATE_COLOR: [u8; 3] = [255, 96, 0];
pub const WINDOW_COLOR: [u8; 3] = [0, 150, 0];
pub const TARGET_COLOR: [u8; 3] = [0, 64, 255];
pub const LABEL_COLOR: [u8; 3] = [255, 255, 255];

const CORNER_RADIUS: f32 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line {
        from: [f32; 2],
        to: [f32; 2],
        color: [u8; 3],
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        color: [u8; 3],
    },
    Label {
        anchor: [f32; 2],
        text: String,
        color: [u8; 3],
    },
}

fn polygon(points: &[[f32; 2]], color: [u8; 3], out: &mut Vec<DrawCommand>) {
    if points.len() < 2 {
        return;
    }
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        out.push(DrawCommand::Line { from, to, color });
    }
}

fn region(r: &Region, out: &mut Vec<DrawCommand>) {
    let (x0, y0, x1, y1) = (r.min[0] as f32, r.min[1] as f32, r.max[0] as f32, r.max[1] as f32);
    polygon(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1]], WINDOW_COLOR, out);
}

/// Commands for every candidate hull (labelled with its vertex count), the
/// merge windows and the resolved targets, drawn in that order.
pub fn draw_commands(candidates: &[Candidate], result: &DetectionResult) -> Vec<DrawCommand> {
    let mut out = Vec::new();

    for c in candidates {
        let hull: Vec<[f32; 2]> = c.hull.iter().map(|p| [p.x as f32, p.y as f32]).collect();
        polygon(&hull, CANDIDATE_COLOR, &mut out);
        if let Some(center) = c.centroid {
            out.push(DrawCommand::Label {
                anchor: [center.x as f32 - 5.0, center.y as f32 + 5.0],
                text: c.approx.len().to_string(),
                color: LABEL_COLOR,
            });
        }
    }

    if let Some(window) = &result.search_window {
        region(&window.left, &mut out);
        region(&window.right, &mut out);
    }

    for target in &result.targets {
        let corners = target.to_pairs();
        polygon(&corners, TARGET_COLOR, &mut out);
        for center in corners {
            out.push(DrawCommand::Circle {
                center,
                radius: CORNER_RADIUS,
                color: TARGET_COLOR,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateParams;
    use crate::resolver::TargetResolver;
    use imageproc::point::Point;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Candidate {
        Candidate::from_points(
            vec![
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
            ],
            &CandidateParams::default(),
        )
    }

    #[test]
    fn empty_frame_draws_nothing() {
        let result = DetectionResult::default();
        assert!(draw_commands(&[], &result).is_empty());
    }

    #[test]
    fn targets_get_outline_and_corner_marks() {
        let cands = vec![rect(100, 100, 40, 100), rect(265, 100, 40, 100)];
        let result = TargetResolver::default().resolve(cands.clone());
        let cmds = draw_commands(&cands, &result);

        let circles = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        let labels: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let window_lines = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, .. } if *color == WINDOW_COLOR))
            .count();
        assert_eq!(circles, 8);
        assert_eq!(labels, vec!["4", "4"]);
        assert_eq!(window_lines, 8);
    }

    #[test]
    fn commands_serialize_with_kind_tag() {
        let cmd = DrawCommand::Circle {
            center: [1.0, 2.0],
            radius: 3.0,
            color: TARGET_COLOR,
        };
        let json = serde_json::to_string(&cmd).expect("json");
        assert!(json.starts_with(r#"{"kind":"circle""#));
    }
}
