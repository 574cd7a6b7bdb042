//! Request descriptors and the negotiator that resolves them.
//!
//! ```text
//!  Command ──PromptOptions──▸ Negotiator.request()  ──▸ RequestTicket
//!                                   │
//!  device value ──▸ Negotiator.respond(value)
//!                                   │
//!            accepted category? ────┼──▸ Resolved { ticket, Value(v) }
//!            alias prefix match? ───┼──▸ Resolved { ticket, Alias(a) }
//!            otherwise ─────────────┴──▸ Err(Rejected)   request stays open
//! ```
//!
//! At most one request is outstanding.  A resolved request is consumed; its
//! ticket never resolves again.  `cancel` drops an outstanding request without
//! resolving it.

use thiserror::Error;

use drafter_core::Point;

use crate::value::{InputCategory, InputValue};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("No input is being requested")]
    NoPendingRequest,
    #[error("Input already requested: {0}")]
    RequestOutstanding(String),
    #[error("Invalid input - {prompt}")]
    Rejected { prompt: String },
}

/// Describes the next input a command needs.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptOptions {
    message: String,
    categories: Vec<InputCategory>,
    aliases: Vec<String>,
}

impl PromptOptions {
    /// # Panics
    ///
    /// A request that accepts nothing can never be satisfied; declaring one
    /// is a bug in the calling command.
    pub fn new(message: impl Into<String>, categories: &[InputCategory]) -> Self {
        assert!(
            !categories.is_empty(),
            "a prompt must accept at least one input category"
        );
        Self {
            message: message.into(),
            categories: categories.to_vec(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<S: AsRef<str>>(mut self, aliases: &[S]) -> Self {
        self.aliases = aliases.iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn categories(&self) -> &[InputCategory] {
        &self.categories
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[inline]
    pub fn accepts(&self, category: InputCategory) -> bool {
        self.categories.contains(&category)
    }

    /// First alias that `text` is a case-insensitive prefix of.
    pub fn match_alias(&self, text: &str) -> Option<&str> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.aliases
            .iter()
            .find(|alias| alias.to_lowercase().starts_with(&needle))
            .map(String::as_str)
    }

    /// Message with the aliases appended, shortcut letters in parentheses:
    /// `Specify next point [(U)ndo/(C)lose]`.
    pub fn prompt(&self) -> String {
        if self.aliases.is_empty() {
            return self.message.clone();
        }
        let options: Vec<String> = self
            .aliases
            .iter()
            .map(|alias| {
                let mut chars = alias.chars();
                match chars.next() {
                    Some(first) => format!("({}){}", first.to_uppercase(), chars.as_str()),
                    None => String::new(),
                }
            })
            .collect();
        format!("{} [{}]", self.message, options.join("/"))
    }
}

/// Identity of one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

/// How a request was satisfied.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Value(InputValue),
    /// One of the declared aliases, in its declared spelling.
    Alias(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub ticket: RequestTicket,
    pub resolution: Resolution,
}

#[derive(Clone, Debug)]
struct PendingRequest {
    ticket: RequestTicket,
    options: PromptOptions,
}

/// Holds the single outstanding request and the pointer context that
/// dynamic input is measured from.
#[derive(Debug, Default)]
pub struct Negotiator {
    pending: Option<PendingRequest>,
    last_point: Option<Point>,
    pointer: Point,
    next_ticket: u64,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────── requests ─────────────────────

    /// Open a request. Fails if one is already outstanding.
    pub fn request(&mut self, options: PromptOptions) -> Result<RequestTicket, InputError> {
        if let Some(pending) = &self.pending {
            return Err(InputError::RequestOutstanding(
                pending.options.message().to_string(),
            ));
        }
        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        log::debug!("Request {:?}: {}", ticket, options.prompt());
        self.pending = Some(PendingRequest { ticket, options });
        Ok(ticket)
    }

    /// Drop the outstanding request without resolving it.
    pub fn cancel(&mut self) -> Option<PromptOptions> {
        self.pending.take().map(|p| p.options)
    }

    pub fn pending(&self) -> Option<&PromptOptions> {
        self.pending.as_ref().map(|p| &p.options)
    }

    pub fn pending_ticket(&self) -> Option<RequestTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Whether the outstanding request accepts `category`.
    pub fn accepts(&self, category: InputCategory) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.options.accepts(category))
    }

    /// Prompt text of the outstanding request.
    pub fn prompt(&self) -> Option<String> {
        self.pending.as_ref().map(|p| p.options.prompt())
    }

    // ───────────────────── classification ─────────────────────

    /// Category of `value` against the outstanding request.
    pub fn classify(&self, value: &InputValue) -> InputCategory {
        match value {
            InputValue::Number(_) if self.accepts(InputCategory::Dynamic) => {
                InputCategory::Dynamic
            }
            other => other.intrinsic_category(),
        }
    }

    /// Try to satisfy the outstanding request with `value`.
    ///
    /// On rejection the request stays outstanding.
    pub fn respond(&mut self, value: InputValue) -> Result<Resolved, InputError> {
        let Some(pending) = &self.pending else {
            return Err(InputError::NoPendingRequest);
        };
        let category = self.classify(&value);
        let accepted = pending.options.accepts(category);
        let alias = match &value {
            InputValue::Text(text) => pending.options.match_alias(text).map(str::to_owned),
            _ => None,
        };

        let resolution = if accepted {
            let value = match (category, value) {
                (InputCategory::Dynamic, InputValue::Number(distance)) => {
                    InputValue::Point(self.project(distance))
                }
                (_, value) => value,
            };
            if let InputValue::Point(p) = &value {
                self.last_point = Some(*p);
            }
            Resolution::Value(value)
        } else if let Some(alias) = alias {
            Resolution::Alias(alias)
        } else {
            let prompt = pending.options.message().to_string();
            log::warn!("Rejected {value} for '{prompt}'");
            return Err(InputError::Rejected { prompt });
        };

        let ticket = match self.pending.take() {
            Some(p) => p.ticket,
            None => return Err(InputError::NoPendingRequest),
        };
        Ok(Resolved { ticket, resolution })
    }

    /// Point `distance` away from the last input point, towards the pointer.
    fn project(&self, distance: f64) -> Point {
        let from = self.last_point.unwrap_or(Point::ORIGIN);
        from.polar(from.angle_to(&self.pointer), distance)
    }

    // ───────────────────── pointer context ─────────────────────

    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn set_last_point(&mut self, point: Option<Point>) {
        self.last_point = point;
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SelectionSet;

    fn point_or_number() -> PromptOptions {
        PromptOptions::new(
            "Specify next point",
            &[InputCategory::Point, InputCategory::Number, InputCategory::Dynamic],
        )
    }

    #[test]
    #[should_panic(expected = "at least one input category")]
    fn test_empty_categories_are_fatal() {
        let _ = PromptOptions::new("Nothing", &[]);
    }

    #[test]
    fn test_prompt_text_marks_alias_shortcuts() {
        let plain = PromptOptions::new("Select objects", &[InputCategory::SelectionSet]);
        assert_eq!(plain.prompt(), "Select objects");

        let opts = point_or_number().with_aliases(&["Undo", "Close"]);
        assert_eq!(opts.prompt(), "Specify next point [(U)ndo/(C)lose]");
    }

    #[test]
    fn test_only_one_request_outstanding() {
        let mut n = Negotiator::new();
        n.request(point_or_number()).unwrap();
        assert_eq!(
            n.request(point_or_number()),
            Err(InputError::RequestOutstanding("Specify next point".into()))
        );
    }

    #[test]
    fn test_classify_dynamic_only_with_dynamic_request() {
        let mut n = Negotiator::new();
        assert_eq!(n.classify(&InputValue::Number(5.0)), InputCategory::Number);

        n.request(PromptOptions::new("Radius", &[InputCategory::Number])).unwrap();
        assert_eq!(n.classify(&InputValue::Number(5.0)), InputCategory::Number);
        n.cancel();

        n.request(point_or_number()).unwrap();
        assert_eq!(n.classify(&InputValue::Number(5.0)), InputCategory::Dynamic);
        assert_eq!(
            n.classify(&InputValue::Text("5".into())),
            InputCategory::String
        );
        assert_eq!(
            n.classify(&InputValue::SelectionSet(SelectionSet::new())),
            InputCategory::SelectionSet
        );
    }

    #[test]
    fn test_dynamic_number_projects_towards_pointer() {
        let mut n = Negotiator::new();
        n.set_last_point(Some(Point::ORIGIN));
        n.set_pointer(Point::new(100.0, 0.0));
        let ticket = n.request(point_or_number()).unwrap();

        let resolved = n.respond(InputValue::Number(5.0)).unwrap();
        assert_eq!(resolved.ticket, ticket);
        match resolved.resolution {
            Resolution::Value(InputValue::Point(p)) => {
                assert!((p.x - 5.0).abs() < 1e-9);
                assert!(p.y.abs() < 1e-9);
            }
            other => panic!("expected point, got {other:?}"),
        }
        let last = n.last_point().unwrap();
        assert!((last.x - 5.0).abs() < 1e-9);
        assert!(n.pending().is_none());
    }

    #[test]
    fn test_plain_number_resolves_as_number() {
        let mut n = Negotiator::new();
        n.set_last_point(Some(Point::new(1.0, 1.0)));
        n.request(PromptOptions::new("Radius", &[InputCategory::Number])).unwrap();
        let resolved = n.respond(InputValue::Number(2.5)).unwrap();
        assert_eq!(resolved.resolution, Resolution::Value(InputValue::Number(2.5)));
        assert_eq!(n.last_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_point_updates_last_point() {
        let mut n = Negotiator::new();
        n.request(point_or_number()).unwrap();
        n.respond(InputValue::Point(Point::new(3.0, 4.0))).unwrap();
        assert_eq!(n.last_point(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_alias_prefix_match_is_case_insensitive() {
        let mut n = Negotiator::new();
        n.request(point_or_number().with_aliases(&["Undo", "Close"]))
            .unwrap();
        let resolved = n.respond(InputValue::Text("cl".into())).unwrap();
        assert_eq!(resolved.resolution, Resolution::Alias("Close".into()));
    }

    #[test]
    fn test_string_category_wins_over_alias() {
        let mut n = Negotiator::new();
        n.request(
            PromptOptions::new("Layer name", &[InputCategory::String]).with_aliases(&["Current"]),
        )
        .unwrap();
        let resolved = n.respond(InputValue::Text("cur".into())).unwrap();
        assert_eq!(resolved.resolution, Resolution::Value(InputValue::Text("cur".into())));
    }

    #[test]
    fn test_rejection_keeps_request_outstanding() {
        let mut n = Negotiator::new();
        let ticket = n
            .request(PromptOptions::new("Select object", &[InputCategory::SingleSelection]))
            .unwrap();
        let err = n.respond(InputValue::Text("nope".into())).unwrap_err();
        assert_eq!(
            err,
            InputError::Rejected {
                prompt: "Select object".into()
            }
        );
        assert_eq!(err.to_string(), "Invalid input - Select object");
        assert_eq!(n.pending_ticket(), Some(ticket));
    }

    #[test]
    fn test_respond_without_request() {
        let mut n = Negotiator::new();
        assert_eq!(
            n.respond(InputValue::Number(1.0)),
            Err(InputError::NoPendingRequest)
        );
    }

    #[test]
    fn test_tickets_are_never_reused() {
        let mut n = Negotiator::new();
        let first = n.request(point_or_number()).unwrap();
        n.cancel();
        let second = n.request(point_or_number()).unwrap();
        assert_ne!(first, second);
    }
}
