//! Entity-creating commands. Each finishes with `Flow::Create`, so the new
//! entity goes straight into the store and is not recorded in history.

use drafter_core::{Entity, Point};
use drafter_input::{InputCategory, InputValue, PromptOptions, Resolution};

use crate::command::{expect_point, Command, CommandContext, CommandError, Flow, PreviewContext};

/// Point request that also takes a typed distance along the pointer direction.
fn next_point(message: &str) -> PromptOptions {
    PromptOptions::new(
        message,
        &[
            InputCategory::Point,
            InputCategory::Number,
            InputCategory::Dynamic,
        ],
    )
}

// ───────────────────────────────────────────────────────────────────
// LINE
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Line {
    start: Option<Point>,
}

impl Command for Line {
    fn execute(&mut self, _cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Prompt(PromptOptions::new(
            "Specify start point",
            &[InputCategory::Point],
        )))
    }

    fn resume(
        &mut self,
        _cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        let point = expect_point(input)?;
        match self.start {
            None => {
                self.start = Some(point);
                Ok(Flow::Prompt(next_point("Specify end point")))
            }
            Some(start) => Ok(Flow::Create(Entity::line(start, point))),
        }
    }

    fn preview(&self, cx: &PreviewContext<'_>) -> Vec<Entity> {
        self.start
            .map(|start| Entity::line(start, cx.pointer))
            .into_iter()
            .collect()
    }
}

// ───────────────────────────────────────────────────────────────────
// CIRCLE
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Circle {
    center: Option<Point>,
}

/// A typed radius arrives as a DYNAMIC point measured from the center.
fn radius_prompt() -> PromptOptions {
    PromptOptions::new(
        "Specify radius",
        &[
            InputCategory::Number,
            InputCategory::Point,
            InputCategory::Dynamic,
        ],
    )
}

impl Command for Circle {
    fn execute(&mut self, _cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Prompt(PromptOptions::new(
            "Specify center point",
            &[InputCategory::Point],
        )))
    }

    fn resume(
        &mut self,
        cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        let Some(center) = self.center else {
            self.center = Some(expect_point(input)?);
            return Ok(Flow::Prompt(radius_prompt()));
        };

        let radius = match input {
            Resolution::Value(InputValue::Number(r)) => r,
            Resolution::Value(InputValue::Point(p)) => center.distance(&p),
            other => return Err(CommandError::UnexpectedInput(other)),
        };
        if radius <= 0.0 {
            cx.notify("Radius must be positive");
            return Ok(Flow::Prompt(radius_prompt()));
        }
        Ok(Flow::Create(Entity::circle(center, radius)))
    }

    fn preview(&self, cx: &PreviewContext<'_>) -> Vec<Entity> {
        match self.center {
            Some(center) if center != cx.pointer => {
                vec![Entity::circle(center, center.distance(&cx.pointer))]
            }
            _ => Vec::new(),
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// POLYLINE
// ───────────────────────────────────────────────────────────────────

/// Collects vertices until `Done` or `Close`.
///
/// `Undo` drops the last vertex. `Close` needs three vertices and repeats
/// the first one at the end.
#[derive(Debug, Default)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    fn next_prompt(&self) -> PromptOptions {
        if self.points.is_empty() {
            PromptOptions::new("Specify start point", &[InputCategory::Point])
        } else {
            next_point("Specify next point").with_aliases(&["Undo", "Close", "Done"])
        }
    }

    fn finish(&mut self) -> Flow {
        if self.points.len() < 2 {
            return Flow::Finish;
        }
        Flow::Create(Entity::polyline(std::mem::take(&mut self.points)))
    }
}

impl Command for Polyline {
    fn execute(&mut self, _cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Prompt(self.next_prompt()))
    }

    fn resume(
        &mut self,
        cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        match input {
            Resolution::Alias(alias) => match alias.as_str() {
                "Undo" => {
                    self.points.pop();
                    cx.set_last_point(self.points.last().copied());
                    Ok(Flow::Prompt(self.next_prompt()))
                }
                "Close" if self.points.len() >= 3 => {
                    let first = self.points[0];
                    self.points.push(first);
                    Ok(self.finish())
                }
                "Close" => {
                    cx.notify("Close needs at least three points");
                    Ok(Flow::Prompt(self.next_prompt()))
                }
                "Done" => Ok(self.finish()),
                _ => Err(CommandError::UnexpectedInput(Resolution::Alias(alias))),
            },
            other => {
                self.points.push(expect_point(other)?);
                Ok(Flow::Prompt(self.next_prompt()))
            }
        }
    }

    fn preview(&self, cx: &PreviewContext<'_>) -> Vec<Entity> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let mut points = self.points.clone();
        points.push(cx.pointer);
        vec![Entity::polyline(points)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drafter_core::{Document, EntityKind};
    use drafter_input::SelectionSet;

    fn point(x: f64, y: f64) -> Resolution {
        Resolution::Value(InputValue::Point(Point::new(x, y)))
    }

    fn alias(name: &str) -> Resolution {
        Resolution::Alias(name.to_string())
    }

    #[test]
    fn test_line_two_points() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);

        let mut line = Line::default();
        assert!(matches!(line.execute(&mut cx), Ok(Flow::Prompt(_))));
        assert!(matches!(line.resume(&mut cx, point(0.0, 0.0)), Ok(Flow::Prompt(_))));
        match line.resume(&mut cx, point(3.0, 4.0)) {
            Ok(Flow::Create(e)) => {
                assert_eq!(e.kind, EntityKind::Line);
                assert_eq!(e.points, vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn test_line_rejects_non_point_resolution() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);

        let mut line = Line::default();
        let result = line.resume(&mut cx, Resolution::Value(InputValue::Text("x".into())));
        assert!(matches!(result, Err(CommandError::UnexpectedInput(_))));
    }

    #[test]
    fn test_circle_radius_from_point_and_number() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);

        let mut circle = Circle::default();
        circle.resume(&mut cx, point(0.0, 0.0)).unwrap();
        match circle.resume(&mut cx, point(0.0, 5.0)) {
            Ok(Flow::Create(e)) => assert_eq!(e.radius, 5.0),
            other => panic!("expected Create, got {other:?}"),
        }

        let mut circle = Circle::default();
        circle.resume(&mut cx, point(1.0, 1.0)).unwrap();
        match circle.resume(&mut cx, Resolution::Value(InputValue::Number(2.5))) {
            Ok(Flow::Create(e)) => assert_eq!(e.radius, 2.5),
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn test_circle_zero_radius_reprompts() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        {
            let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);
            let mut circle = Circle::default();
            circle.resume(&mut cx, point(0.0, 0.0)).unwrap();
            let flow = circle.resume(&mut cx, Resolution::Value(InputValue::Number(0.0)));
            assert!(matches!(flow, Ok(Flow::Prompt(_))));
        }
        assert_eq!(messages, vec!["Radius must be positive".to_string()]);
    }

    #[test]
    fn test_polyline_undo_and_close() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);

        let mut pl = Polyline::default();
        pl.resume(&mut cx, point(0.0, 0.0)).unwrap();
        pl.resume(&mut cx, point(10.0, 0.0)).unwrap();
        pl.resume(&mut cx, point(99.0, 99.0)).unwrap();
        pl.resume(&mut cx, alias("Undo")).unwrap();
        pl.resume(&mut cx, point(10.0, 10.0)).unwrap();

        match pl.resume(&mut cx, alias("Close")) {
            Ok(Flow::Create(e)) => {
                assert_eq!(e.kind, EntityKind::Polyline);
                assert_eq!(e.points.len(), 4);
                assert_eq!(e.points.first(), e.points.last());
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn test_polyline_undo_moves_last_point_back() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(
            &mut doc,
            &selection,
            &mut messages,
            Some(Point::new(100.0, 100.0)),
        );

        let mut pl = Polyline::default();
        pl.points = vec![Point::ORIGIN, Point::new(100.0, 100.0)];
        pl.resume(&mut cx, alias("Undo")).unwrap();
        assert_eq!(cx.last_point(), Some(Point::ORIGIN));

        pl.resume(&mut cx, alias("Undo")).unwrap();
        assert_eq!(cx.last_point(), None);
    }

    #[test]
    fn test_circle_radius_prompt_takes_dynamic() {
        assert!(radius_prompt().accepts(InputCategory::Dynamic));
    }

    #[test]
    fn test_polyline_done_with_one_point_creates_nothing() {
        let mut doc = Document::new();
        let selection = SelectionSet::new();
        let mut messages: Vec<String> = Vec::new();
        let mut cx = CommandContext::new(&mut doc, &selection, &mut messages, None);

        let mut pl = Polyline::default();
        pl.resume(&mut cx, point(0.0, 0.0)).unwrap();
        assert!(matches!(pl.resume(&mut cx, alias("Done")), Ok(Flow::Finish)));
    }

    #[test]
    fn test_polyline_preview_trails_pointer() {
        let doc = Document::new();
        let mut pl = Polyline::default();
        let cx = PreviewContext {
            document: &doc,
            pointer: Point::new(5.0, 5.0),
            last_point: None,
        };
        assert!(pl.preview(&cx).is_empty());
        pl.points.push(Point::ORIGIN);
        let preview = pl.preview(&cx);
        assert_eq!(preview[0].points, vec![Point::ORIGIN, Point::new(5.0, 5.0)]);
    }
}
