//! Consistency between engine support flags and authored models.
//!
//! The analysis engine reports, per method, whether it already has models for
//! it. Models authored outside the engine should agree with that flag. This
//! module only reports disagreements; it never repairs them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::method::Method;
use crate::sorting::ModelsBySignature;

/// A disagreement between methods and models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsistencyNotice {
    /// Models exist for a signature the engine did not list.
    #[serde(rename_all = "camelCase")]
    MissingMethod { signature: String },
    /// The engine's support flag disagrees with the models.
    #[serde(rename_all = "camelCase")]
    InconsistentSupported {
        signature: String,
        expected_supported: bool,
    },
}

impl ConsistencyNotice {
    pub fn signature(&self) -> &str {
        match self {
            ConsistencyNotice::MissingMethod { signature } => signature,
            ConsistencyNotice::InconsistentSupported { signature, .. } => signature,
        }
    }
}

/// Receiver of consistency notices.
pub trait ConsistencyNotifier {
    fn notify(&mut self, notice: &ConsistencyNotice);
}

/// Logs each notice as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl ConsistencyNotifier for TracingNotifier {
    fn notify(&mut self, notice: &ConsistencyNotice) {
        match notice {
            ConsistencyNotice::MissingMethod { signature } => {
                warn!(%signature, "model for method that is not in the method list");
            }
            ConsistencyNotice::InconsistentSupported {
                signature,
                expected_supported,
            } => {
                warn!(
                    %signature,
                    expected_supported,
                    "supported flag does not match the models"
                );
            }
        }
    }
}

impl ConsistencyNotifier for Vec<ConsistencyNotice> {
    fn notify(&mut self, notice: &ConsistencyNotice) {
        self.push(notice.clone());
    }
}

/// Compare methods against models and notify about each disagreement.
///
/// A method counts as supported by its models when any of them is a source,
/// sink, summary or neutral model. Notices are produced in signature order.
pub fn check_consistency(
    methods: &[Method],
    models: &ModelsBySignature,
    notifier: &mut dyn ConsistencyNotifier,
) {
    let by_signature: HashMap<&str, &Method> = methods
        .iter()
        .map(|method| (method.signature(), method))
        .collect();

    for (signature, modeled) in models {
        let Some(method) = by_signature.get(signature.as_str()) else {
            notifier.notify(&ConsistencyNotice::MissingMethod {
                signature: signature.clone(),
            });
            continue;
        };

        let expected_supported = modeled.iter().any(|m| m.model.supports_method());
        if expected_supported != method.supported {
            notifier.notify(&ConsistencyNotice::InconsistentSupported {
                signature: signature.clone(),
                expected_supported,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::EndpointIdentity;
    use crate::model::{EndpointModel, ModeledMethod, Provenance, SourceModel, TypeModel};

    fn identity(signature: &str) -> EndpointIdentity {
        EndpointIdentity {
            signature: signature.to_string(),
            ..EndpointIdentity::default()
        }
    }

    fn method(signature: &str, supported: bool) -> Method {
        Method {
            identity: identity(signature),
            library: "lib".to_string(),
            library_version: None,
            supported,
            supported_type: Default::default(),
            usages: Vec::new(),
            endpoint_kind: None,
        }
    }

    fn source(signature: &str) -> ModeledMethod {
        ModeledMethod::new(
            identity(signature),
            EndpointModel::Source(SourceModel {
                output: "ReturnValue".to_string(),
                kind: "remote".to_string(),
                provenance: Provenance::Manual,
            }),
        )
    }

    fn type_model(signature: &str) -> ModeledMethod {
        ModeledMethod::new(
            identity(signature),
            EndpointModel::Type(TypeModel {
                related_type_name: "Foo".to_string(),
                path: "ReturnValue".to_string(),
            }),
        )
    }

    fn check(methods: &[Method], models: &ModelsBySignature) -> Vec<ConsistencyNotice> {
        let mut notices = Vec::new();
        check_consistency(methods, models, &mut notices);
        notices
    }

    #[test]
    fn agreeing_flags_produce_nothing() {
        let methods = vec![method("a#m", true), method("b#m", false)];
        let mut models = ModelsBySignature::new();
        models.insert("a#m".to_string(), vec![source("a#m")]);
        models.insert("b#m".to_string(), vec![ModeledMethod::none(identity("b#m"))]);
        assert!(check(&methods, &models).is_empty());
    }

    #[test]
    fn missing_method_is_reported() {
        let mut models = ModelsBySignature::new();
        models.insert("gone#m".to_string(), vec![source("gone#m")]);
        assert_eq!(
            check(&[], &models),
            vec![ConsistencyNotice::MissingMethod {
                signature: "gone#m".to_string()
            }]
        );
    }

    #[test]
    fn supported_flag_mismatch_is_reported() {
        let methods = vec![method("a#m", false), method("b#m", true)];
        let mut models = ModelsBySignature::new();
        models.insert("a#m".to_string(), vec![source("a#m")]);
        models.insert("b#m".to_string(), vec![type_model("b#m")]);

        assert_eq!(
            check(&methods, &models),
            vec![
                ConsistencyNotice::InconsistentSupported {
                    signature: "a#m".to_string(),
                    expected_supported: true,
                },
                ConsistencyNotice::InconsistentSupported {
                    signature: "b#m".to_string(),
                    expected_supported: false,
                },
            ]
        );
    }

    #[test]
    fn notices_serialize_with_type_tag() {
        let notice = ConsistencyNotice::InconsistentSupported {
            signature: "a#m".to_string(),
            expected_supported: true,
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "inconsistent_supported");
        assert_eq!(json["expectedSupported"], true);
        assert_eq!(notice.signature(), "a#m");
    }

    #[test]
    fn tracing_notifier_keeps_no_state() {
        assert_eq!(std::mem::size_of::<TracingNotifier>(), 0);

        let mut models = ModelsBySignature::new();
        models.insert("gone#m".to_string(), vec![source("gone#m")]);
        let mut notifier = TracingNotifier;
        check_consistency(&[], &models, &mut notifier);
        check_consistency(&[], &models, &mut notifier);
    }

    #[test]
    fn collected_notices_accumulate_across_checks() {
        let mut models = ModelsBySignature::new();
        models.insert("gone#m".to_string(), vec![source("gone#m")]);

        let mut notices = Vec::new();
        check_consistency(&[], &models, &mut notices);
        check_consistency(&[method("gone#m", false)], &models, &mut notices);

        assert_eq!(
            notices,
            vec![
                ConsistencyNotice::MissingMethod {
                    signature: "gone#m".to_string()
                },
                ConsistencyNotice::InconsistentSupported {
                    signature: "gone#m".to_string(),
                    expected_supported: true,
                },
            ]
        );
    }
}
