//! Constraint validation over the matched bindings.
//!
//! Three passes run in a fixed order: exclusivity, required presence and
//! dependency satisfaction. Each is defined on set membership, so the order
//! in which arguments were given never changes the outcome.

use tracing::debug;

use crate::binding::FieldBinding;
use crate::error::{ArgumentError, Result};
use crate::field::DependencyType;

/// Validates the matched bindings, given as indices into `bindings`.
pub(crate) fn validate(bindings: &[FieldBinding], processed: &[usize]) -> Result<()> {
    if processed.is_empty() {
        return Ok(());
    }

    check_exclusive(bindings, processed)?;
    check_required(bindings, processed)?;
    check_dependencies(bindings, processed)?;

    debug!(matched = processed.len(), "argument constraints satisfied");
    Ok(())
}

fn is_processed(bindings: &[FieldBinding], processed: &[usize], name: &str) -> bool {
    processed.iter().any(|&i| bindings[i].name() == name)
}

fn check_exclusive(bindings: &[FieldBinding], processed: &[usize]) -> Result<()> {
    for &index in processed {
        let binding = &bindings[index];
        if binding.is_exclusive() && processed.len() > 1 {
            return Err(ArgumentError::Exclusive {
                parameter: binding.display_label(),
            });
        }
    }
    Ok(())
}

fn check_required(bindings: &[FieldBinding], processed: &[usize]) -> Result<()> {
    for binding in bindings.iter().filter(|b| b.is_required()) {
        if !is_processed(bindings, processed, binding.name()) {
            return Err(ArgumentError::Required {
                parameter: binding.display_label(),
            });
        }
    }
    Ok(())
}

fn check_dependencies(bindings: &[FieldBinding], processed: &[usize]) -> Result<()> {
    for &index in processed {
        let binding = &bindings[index];
        let dependencies = binding.dependencies();
        if dependencies.is_empty() {
            continue;
        }

        let unknown: Vec<&str> = dependencies
            .iter()
            .map(String::as_str)
            .filter(|name| !bindings.iter().any(|b| b.name() == *name))
            .collect();
        if !unknown.is_empty() {
            return Err(ArgumentError::Dependent(format!(
                "field '{}' depends on unknown field(s) {}",
                binding.name(),
                unknown.join(", ")
            )));
        }

        let depends_on = |b: &FieldBinding| dependencies.iter().any(|d| d == b.name());

        let overall: Vec<&FieldBinding> = bindings.iter().filter(|b| depends_on(*b)).collect();
        let others = processed
            .iter()
            .filter(|&&i| i != index)
            .filter(|&&i| depends_on(&bindings[i]))
            .count();

        let labels = |joiner: &str| {
            overall
                .iter()
                .map(|b| b.display_label())
                .collect::<Vec<_>>()
                .join(joiner)
        };

        match binding.dependency_type() {
            DependencyType::Optional => {
                if !overall.is_empty() && others == 0 {
                    return Err(ArgumentError::Dependent(format!(
                        "parameter '{}' depends on {}",
                        binding.display_label(),
                        labels(" or ")
                    )));
                }
            }
            DependencyType::Required => {
                if others != overall.len() {
                    return Err(ArgumentError::Dependent(format!(
                        "parameter '{}' requires {}",
                        binding.display_label(),
                        labels(" and ")
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::discover_bindings;
    use crate::error::ErrorKind;
    use crate::field::FieldSpec;

    fn bindings(specs: Vec<FieldSpec>) -> Vec<FieldBinding> {
        discover_bindings(specs).unwrap()
    }

    fn kind(result: Result<()>) -> Option<ErrorKind> {
        result.err().map(|e| e.kind())
    }

    #[test]
    fn nothing_processed_is_valid() {
        let b = bindings(vec![FieldSpec::switch::<bool>("a").solid("a").required()]);
        assert!(validate(&b, &[]).is_ok());
    }

    #[test]
    fn exclusive_alone_is_valid() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a").solid("a").exclusive(),
            FieldSpec::switch::<bool>("b").solid("b"),
        ]);
        assert!(validate(&b, &[0]).is_ok());
    }

    #[test]
    fn exclusive_with_others_fails_in_any_order() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a").solid("a").exclusive(),
            FieldSpec::switch::<bool>("b").solid("b"),
        ]);
        assert_eq!(kind(validate(&b, &[0, 1])), Some(ErrorKind::Exclusive));
        assert_eq!(kind(validate(&b, &[1, 0])), Some(ErrorKind::Exclusive));
    }

    #[test]
    fn missing_required_fails() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a").solid("a").required(),
            FieldSpec::switch::<bool>("b").solid("b"),
        ]);
        assert_eq!(kind(validate(&b, &[1])), Some(ErrorKind::Required));
        assert!(validate(&b, &[1, 0]).is_ok());
    }

    #[test]
    fn unknown_dependency_fails() {
        let b = bindings(vec![FieldSpec::switch::<bool>("a").solid("a").depends_on(["typo"])]);
        assert_eq!(kind(validate(&b, &[0])), Some(ErrorKind::Dependent));
    }

    #[test]
    fn optional_dependency_needs_one() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a").solid("a").depends_on(["b", "c"]),
            FieldSpec::switch::<bool>("b").solid("b"),
            FieldSpec::switch::<bool>("c").solid("c"),
        ]);
        assert_eq!(kind(validate(&b, &[0])), Some(ErrorKind::Dependent));
        assert!(validate(&b, &[0, 1]).is_ok());
        assert!(validate(&b, &[2, 0]).is_ok());
    }

    #[test]
    fn required_dependency_needs_all() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a")
                .solid("a")
                .depends_on(["b", "c"])
                .dependency(DependencyType::Required),
            FieldSpec::switch::<bool>("b").solid("b"),
            FieldSpec::switch::<bool>("c").solid("c"),
        ]);
        assert_eq!(kind(validate(&b, &[0, 1])), Some(ErrorKind::Dependent));
        assert!(validate(&b, &[1, 0, 2]).is_ok());
    }

    #[test]
    fn dependency_message_lists_labels() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a")
                .solid("alpha")
                .depends_on(["b", "c"])
                .dependency(DependencyType::Required),
            FieldSpec::switch::<bool>("b").solid("beta"),
            FieldSpec::switch::<bool>("c").brief("c"),
        ]);
        let message = validate(&b, &[0]).unwrap_err().to_string();
        assert!(message.contains("--beta and -c"), "{message}");
    }

    #[test]
    fn dependency_on_unprocessed_field_does_not_apply() {
        let b = bindings(vec![
            FieldSpec::switch::<bool>("a").solid("a"),
            FieldSpec::switch::<bool>("b").solid("b").depends_on(["a"]),
        ]);
        assert!(validate(&b, &[0]).is_ok());
    }
}
