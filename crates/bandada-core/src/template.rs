// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variable substitution for message templates.
//!
//! A variable's `name` is a literal token (e.g. `{city}`); rendering draws
//! one value uniformly at random per variable per call and replaces every
//! occurrence of the token with that single drawn value. Rendering is
//! non-idempotent and non-deterministic on purpose: repeated calls over the
//! same template may produce different messages, which is what makes the
//! per-recipient personalization look organic to the gateway provider.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BandadaError;
use crate::types::MessageVariable;

/// Variables whose token literally occurs in `template`, in supplied order.
pub fn used_variables<'a>(
    template: &str,
    variables: &'a [MessageVariable],
) -> Vec<&'a MessageVariable> {
    variables
        .iter()
        .filter(|v| template.contains(&v.name))
        .collect()
}

/// Render `template` with an explicit randomness source.
///
/// One uniform draw per variable per call; all occurrences of the same token
/// within one message receive the same drawn value. Variables with an empty
/// pool are left untouched (pre-dispatch validation rejects them when used).
pub fn render_with<R: Rng + ?Sized>(
    template: &str,
    variables: &[MessageVariable],
    rng: &mut R,
) -> String {
    let mut result = template.to_string();
    for variable in variables {
        if let Some(value) = variable.values.choose(rng) {
            result = result.replace(&variable.name, value);
        }
    }
    result
}

/// Render `template` using the thread-local RNG.
pub fn render(template: &str, variables: &[MessageVariable]) -> String {
    render_with(template, variables, &mut rand::thread_rng())
}

/// Pre-dispatch check: every variable used by `template` must have a
/// non-empty value pool with no blank entries. A violation blocks the whole
/// run before any message is sent.
pub fn check_variables(
    template: &str,
    variables: &[MessageVariable],
) -> Result<(), BandadaError> {
    let offending: Vec<&str> = used_variables(template, variables)
        .into_iter()
        .filter(|v| v.values.is_empty() || v.values.iter().any(|value| value.trim().is_empty()))
        .map(|v| v.name.as_str())
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(BandadaError::Validation(format!(
            "the following variables have empty values: {}",
            offending.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn variable(name: &str, values: &[&str]) -> MessageVariable {
        MessageVariable {
            id: name.trim_matches(['{', '}']).to_string(),
            name: name.to_string(),
            description: String::new(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn every_occurrence_gets_the_same_drawn_value() {
        let vars = [variable("{city}", &["Lima", "Quito", "Bogotá"])];
        let mut rng = StdRng::seed_from_u64(7);
        let rendered = render_with("From {city}, always {city}", &vars, &mut rng);
        assert!(!rendered.contains("{city}"));
        let first_word = rendered.split(',').next().unwrap();
        let city = first_word.strip_prefix("From ").unwrap();
        assert_eq!(rendered, format!("From {city}, always {city}"));
    }

    #[test]
    fn no_used_token_survives_rendering() {
        let vars = [
            variable("{name}", &["Ana"]),
            variable("{city}", &["Lima", "Quito"]),
        ];
        let rendered = render("Hola {name} de {city}! {city} te espera.", &vars);
        assert!(!rendered.contains("{name}"));
        assert!(!rendered.contains("{city}"));
    }

    #[test]
    fn rendering_is_nondeterministic_across_seeds() {
        // Not a bug: each render call draws fresh values. Distinct seeds over
        // a large pool must be able to disagree.
        let values: Vec<String> = (0..64).map(|i| format!("v{i}")).collect();
        let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let vars = [variable("{x}", &value_refs)];
        let a = render_with("{x}", &vars, &mut StdRng::seed_from_u64(1));
        let b = render_with("{x}", &vars, &mut StdRng::seed_from_u64(2));
        let c = render_with("{x}", &vars, &mut StdRng::seed_from_u64(3));
        assert!(a != b || b != c, "three seeds all drew the same value");
    }

    #[test]
    fn unused_variables_do_not_affect_output() {
        let vars = [variable("{city}", &["Lima"])];
        assert_eq!(render("no tokens here", &vars), "no tokens here");
    }

    #[test]
    fn single_value_pool_renders_deterministically() {
        let vars = [variable("{city}", &["Lima"])];
        assert_eq!(render("Hola {city}", &vars), "Hola Lima");
    }

    #[test]
    fn used_variables_matches_literal_tokens_only() {
        let vars = [
            variable("{city}", &["Lima"]),
            variable("{name}", &["Ana"]),
        ];
        let used = used_variables("Hola {city}", &vars);
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].name, "{city}");
    }

    #[test]
    fn check_rejects_empty_pool_for_used_variable() {
        let vars = [variable("{city}", &[])];
        let err = check_variables("Hola {city}", &vars).unwrap_err();
        assert!(err.to_string().contains("{city}"));
    }

    #[test]
    fn check_rejects_blank_entries() {
        let vars = [variable("{city}", &["Lima", "  "])];
        assert!(check_variables("Hola {city}", &vars).is_err());
    }

    #[test]
    fn check_ignores_unused_variables() {
        let vars = [variable("{city}", &[])];
        check_variables("no tokens", &vars).expect("unused variable must not block");
    }
}
