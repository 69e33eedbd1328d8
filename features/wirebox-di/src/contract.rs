//! Structural contract validation
//!
//! A contract is satisfied if the implementation declares every contract method (completeness) and
//! each of those methods accepts exactly the parameters the contract promises (compatibility).

use wirebox_config::SignatureOrder;

use crate::{
    errors::ContractError,
    signature::{Interface, Param},
};

/// Validates `implementation` against `contract`
///
/// Missing methods are all reported at once. Signatures are then checked method by method in name
/// order, and the first incompatible method is reported with all of its offending parameters.
pub fn validate(
    implementation: &Interface,
    contract: &Interface,
    order: SignatureOrder,
) -> Result<(), ContractError> {
    let missing: Vec<String> = contract
        .methods()
        .filter(|(method, _)| !implementation.contains(method))
        .map(|(method, _)| method.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ContractError::MissingMethods {
            contract: contract.name().to_string(),
            methods: missing,
        });
    }

    for (method, expected) in contract.methods() {
        let actual = implementation.get(method).unwrap_or_default();
        let offending = incompatible_params(expected, actual, order);

        if !offending.is_empty() {
            tracing::debug!(
                "'{}' does not honour {}::{method}: {offending:?}",
                implementation.name(),
                contract.name()
            );
            return Err(ContractError::IncompatibleSignature {
                contract: contract.name().to_string(),
                method: method.to_string(),
                parameters: offending,
            });
        }
    }

    Ok(())
}

/// Names of all parameters which break the contract, in order of discovery
fn incompatible_params(expected: &[Param], actual: &[Param], order: SignatureOrder) -> Vec<String> {
    let mut offending: Vec<String> = Vec::new();
    let mut flag = |param: &Param| {
        if !offending.iter().any(|name| name == param.ident()) {
            offending.push(param.ident().to_string());
        }
    };

    // Every promised parameter must be accepted
    for param in expected {
        match actual.iter().find(|p| p.ident() == param.ident()) {
            Some(found) if param.kind.accepts(found.kind) => {}
            _ => flag(param),
        }
    }

    // The implementation may not demand anything that was not promised
    for param in actual {
        if !expected.iter().any(|p| p.ident() == param.ident()) {
            flag(param);
        }
    }

    if order == SignatureOrder::Strict {
        let expected_positional = expected.iter().filter(|p| p.kind.is_positional());
        let actual_positional = actual.iter().filter(|p| p.kind.is_positional());

        for (contract_param, impl_param) in expected_positional.zip(actual_positional) {
            if contract_param.ident() != impl_param.ident() {
                flag(contract_param);
            }
        }
    }

    offending
}
