//! A subset of the task service's filter language, evaluated by the local store.
//!
//! Supported terms: `@label`, `no deadline`, `no date`, `p1`..`p4` (p1 is the most
//! urgent), `subtask`, and `all` / `*`. Terms combine with `!`, `&` and `|`, where
//! `&` binds tighter than `|`, and parentheses group. An empty query matches
//! every task.

use crate::error::RequestError;
use crate::fields::Priority;
use crate::labels::normalise_label;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Label(String),
    NoDeadline,
    NoDate,
    Priority(Priority),
    Subtask,
    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Parse a query string.
    pub fn parse(query: &str) -> Result<Filter, RequestError> {
        if query.trim().is_empty() {
            return Ok(Filter::All);
        }
        let mut parser = Parser {
            query,
            chars: query.chars().collect(),
            pos: 0,
        };
        let filter = parser.or_expr()?;
        parser.skip_ws();
        if parser.pos < parser.chars.len() {
            return Err(parser.error(format!("unexpected '{}'", parser.chars[parser.pos])));
        }
        Ok(filter)
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Label(l) => task.has_label(l),
            Filter::NoDeadline => task.deadline.is_none(),
            Filter::NoDate => task.due.is_none(),
            Filter::Priority(p) => task.priority == *p,
            Filter::Subtask => task.parent_id.is_some(),
            Filter::Not(inner) => !inner.matches(task),
            Filter::And(parts) => parts.iter().all(|f| f.matches(task)),
            Filter::Or(parts) => parts.iter().any(|f| f.matches(task)),
        }
    }
}

struct Parser<'q> {
    query: &'q str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> RequestError {
        RequestError::invalid_filter(self.query, reason)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.chars.get(self.pos) == Some(&c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Filter, RequestError> {
        let mut parts = vec![self.and_expr()?];
        while self.eat('|') {
            parts.push(self.and_expr()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { Filter::Or(parts) })
    }

    fn and_expr(&mut self) -> Result<Filter, RequestError> {
        let mut parts = vec![self.unary()?];
        while self.eat('&') {
            parts.push(self.unary()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { Filter::And(parts) })
    }

    fn unary(&mut self) -> Result<Filter, RequestError> {
        let mut negations = 0usize;
        while self.eat('!') {
            negations += 1;
        }
        let operand = if self.eat('(') {
            let inner = self.or_expr()?;
            if !self.eat(')') {
                return Err(self.error("missing ')'"));
            }
            inner
        } else {
            self.term()?
        };
        // Double negation cancels.
        Ok(if negations % 2 == 1 {
            Filter::Not(Box::new(operand))
        } else {
            operand
        })
    }

    fn term(&mut self) -> Result<Filter, RequestError> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.chars.len() && !matches!(self.chars[self.pos], '&' | '|' | '(' | ')') {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let word = raw.trim().to_lowercase();
        let filter = match word.as_str() {
            "" => return Err(self.error("expected a term")),
            "all" | "*" => Filter::All,
            "no deadline" => Filter::NoDeadline,
            "no date" => Filter::NoDate,
            "subtask" | "subtasks" => Filter::Subtask,
            "p1" => Filter::Priority(Priority::HIGHEST),
            "p2" => Filter::Priority(priority(3)),
            "p3" => Filter::Priority(priority(2)),
            "p4" => Filter::Priority(Priority::LOWEST),
            w if w.starts_with('@') => {
                let label = normalise_label(w);
                if label.is_empty() {
                    return Err(self.error("empty label"));
                }
                Filter::Label(label)
            }
            w => return Err(self.error(format!("unknown term '{w}'"))),
        };
        Ok(filter)
    }
}

fn priority(level: u8) -> Priority {
    Priority::new(level).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(labels: &[&str]) -> Task {
        let mut t = Task::new("1", "x");
        t.labels = labels.iter().map(|l| l.to_string()).collect();
        t
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(Filter::parse("  ").unwrap(), Filter::All);
        assert!(Filter::parse("").unwrap().matches(&task(&[])));
    }

    #[test]
    fn test_label_term() {
        let f = Filter::parse("@goal").unwrap();
        assert!(f.matches(&task(&["goal"])));
        assert!(f.matches(&task(&["@goal"])));
        assert!(!f.matches(&task(&["work"])));
    }

    #[test]
    fn test_dated_goal_query() {
        let f = Filter::parse("@goal & !no deadline").unwrap();
        let mut dated = task(&["goal"]);
        dated.deadline = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(f.matches(&dated));
        assert!(!f.matches(&task(&["goal"])));
    }

    #[test]
    fn test_precedence_and_groups() {
        let f = Filter::parse("@a | @b & @c").unwrap();
        assert!(f.matches(&task(&["a"])));
        assert!(!f.matches(&task(&["b"])));
        assert!(f.matches(&task(&["b", "c"])));

        let g = Filter::parse("(@a | @b) & @c").unwrap();
        assert!(!g.matches(&task(&["a"])));
        assert!(g.matches(&task(&["a", "c"])));
    }

    #[test]
    fn test_priority_and_subtask() {
        let mut t = task(&[]);
        t.priority = Priority::HIGHEST;
        t.parent_id = Some("9".into());
        assert!(Filter::parse("p1 & subtask").unwrap().matches(&t));
        assert!(!Filter::parse("p4").unwrap().matches(&t));
    }

    #[test]
    fn test_long_negation_runs() {
        let f = Filter::parse(&format!("{}@goal", "!".repeat(100_000))).unwrap();
        assert_eq!(f, Filter::Label("goal".into()));
        let g = Filter::parse(&format!("{} @goal", "! ".repeat(100_001))).unwrap();
        assert!(!g.matches(&task(&["goal"])));
        assert!(g.matches(&task(&["work"])));
        assert!(Filter::parse(&"!".repeat(50_000)).is_err());
    }

    #[test]
    fn test_invalid_queries() {
        for q in ["@goal &", "(@a", "bogus", "@", "@a)"] {
            assert!(
                matches!(Filter::parse(q), Err(RequestError::InvalidFilter { .. })),
                "query {q:?} should fail"
            );
        }
    }
}
