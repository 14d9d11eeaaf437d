//! Type usage checks

use super::Element;
use crate::inspection::Findings;
use crate::params::ParameterStore;

/// Flag elements whose type contains a denied fragment
///
/// Only the part before the first comma is examined and the comparison is a
/// plain substring test, so `MyObjectList` is caught by `Object`.
pub(super) fn denied_type_fragment(
    elements: &[Element<'_>],
    params: &ParameterStore,
    denied_key: &str,
) -> Findings {
    let Some(denied) = params.resolve_list(denied_key) else {
        return Findings::none();
    };

    let mut findings = Findings::none();
    for element in elements {
        let Some(type_name) = element.type_name else {
            continue;
        };
        let segment = type_name.leading_segment();
        for fragment in &denied {
            if segment.contains(fragment.as_str()) {
                findings.push(format!(
                    "{} '{}' has type '{}', which contains '{}'",
                    element.noun, element.name, segment, fragment
                ));
            }
        }
    }
    findings
}
