//! Paint [`DrawCommand`]s onto an RGB frame.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::detect::DrawCommand;

/// Render `commands` in order. Labels are marked with a cross at their
/// anchor since no font is bundled.
pub fn render_overlay(canvas: &mut RgbImage, commands: &[DrawCommand]) {
    for cmd in commands {
        match cmd {
            DrawCommand::Line { from, to, color } => {
                draw_line_segment_mut(canvas, (from[0], from[1]), (to[0], to[1]), Rgb(*color));
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                let c = (center[0].round() as i32, center[1].round() as i32);
                draw_hollow_circle_mut(canvas, c, radius.round().max(1.0) as i32, Rgb(*color));
            }
            DrawCommand::Label { anchor, color, .. } => {
                draw_cross_mut(
                    canvas,
                    Rgb(*color),
                    anchor[0].round() as i32,
                    anchor[1].round() as i32,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_lines_and_circles() {
        let mut canvas = RgbImage::new(32, 32);
        render_overlay(
            &mut canvas,
            &[
                DrawCommand::Line {
                    from: [0.0, 5.0],
                    to: [31.0, 5.0],
                    color: [255, 0, 0],
                },
                DrawCommand::Circle {
                    center: [16.0, 20.0],
                    radius: 4.0,
                    color: [0, 0, 255],
                },
                DrawCommand::Label {
                    anchor: [3.0, 28.0],
                    text: "4".into(),
                    color: [0, 255, 0],
                },
            ],
        );
        assert_eq!(canvas.get_pixel(10, 5).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(20, 20).0, [0, 0, 255]);
        assert_eq!(canvas.get_pixel(3, 28).0, [0, 255, 0]);
        assert_eq!(canvas.get_pixel(16, 20).0, [0, 0, 0]);
    }

    #[test]
    fn off_canvas_commands_are_clipped() {
        let mut canvas = RgbImage::new(8, 8);
        render_overlay(
            &mut canvas,
            &[DrawCommand::Circle {
                center: [-100.0, -100.0],
                radius: 3.0,
                color: [255, 255, 255],
            }],
        );
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
