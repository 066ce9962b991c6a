//! Hybrid formula parsing.
//!
//! ```text
//! formula := pair (',' pair)*
//! pair    := role ':' percentage
//! ```
//!
//! Whitespace around every token is ignored. A pair that does not parse is
//! dropped and the rest of the formula still applies.

/// One `role:percentage` term of a hybrid formula.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaTerm {
    pub role: String,
    pub percentage: f64,
}

/// Parses a hybrid formula, keeping every well-formed pair in order.
///
/// ## Example
/// ```rust
/// use tipsplit_core::formula::parse_formula;
///
/// let terms = parse_formula(" server : 60 , busser:oops, bar:15.5 ");
/// assert_eq!(terms.len(), 2);
/// assert_eq!(terms[0].role, "server");
/// assert_eq!(terms[1].percentage, 15.5);
/// ```
pub fn parse_formula(formula: &str) -> Vec<FormulaTerm> {
    formula.split(',').filter_map(parse_pair).collect()
}

fn parse_pair(pair: &str) -> Option<FormulaTerm> {
    let (role, percentage) = pair.split_once(':')?;
    let role = role.trim();
    if role.is_empty() {
        return None;
    }

    let percentage: f64 = percentage.trim().parse().ok()?;
    if !percentage.is_finite() {
        return None;
    }

    Some(FormulaTerm {
        role: role.to_string(),
        percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_pairs_in_order() {
        let terms = parse_formula("server:60,busser:25,host:15");
        let roles: Vec<&str> = terms.iter().map(|t| t.role.as_str()).collect();
        assert_eq!(roles, vec!["server", "busser", "host"]);
        assert_eq!(terms[2].percentage, 15.0);
    }

    #[test]
    fn test_drops_malformed_pairs() {
        let terms = parse_formula("server:60, :10, busser, bar:abc, host:NaN, cook:1:2, runner: 5 ");
        assert_eq!(
            terms,
            vec![
                FormulaTerm { role: "server".to_string(), percentage: 60.0 },
                FormulaTerm { role: "runner".to_string(), percentage: 5.0 },
            ]
        );
    }

    #[test]
    fn test_keeps_non_positive_terms_for_the_allocator() {
        let terms = parse_formula("server:0, busser:-10");
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn test_empty_formula() {
        assert!(parse_formula("").is_empty());
        assert!(parse_formula(" , ,").is_empty());
    }
}
