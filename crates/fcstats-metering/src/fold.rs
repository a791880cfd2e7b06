//! Datapoint folds
//!
//! Groups are kept in ordered maps, so output is sorted by name.

use std::collections::BTreeMap;

use fcstats_common::{
    FunctionDuration, FunctionDurationDatapoint, ServiceInvocationDatapoint, ServiceInvocations,
    ServiceStats,
};

/// Sum billable invocations per service and overall.
///
/// Each value is truncated toward zero before it is added, both to its
/// service's subtotal and to the grand total. Sums saturate at `i64::MAX`.
pub fn fold_service_invocations(points: &[ServiceInvocationDatapoint]) -> ServiceStats {
    let mut per_service: BTreeMap<&str, i64> = BTreeMap::new();
    let mut total_invocations = 0i64;

    for point in points {
        let count = point.value as i64;
        let subtotal = per_service.entry(point.service_name.as_str()).or_insert(0);
        *subtotal = subtotal.saturating_add(count);
        total_invocations = total_invocations.saturating_add(count);
    }

    ServiceStats {
        total_invocations,
        services: per_service
            .into_iter()
            .map(|(name, invocations)| ServiceInvocations {
                name: name.to_string(),
                invocations,
            })
            .collect(),
    }
}

/// Mean duration per `service/function`
pub fn fold_function_durations(points: &[FunctionDurationDatapoint]) -> Vec<FunctionDuration> {
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for point in points {
        samples
            .entry(point.qualified_name())
            .or_default()
            .push(point.value);
    }

    samples
        .into_iter()
        .map(|(name, values)| FunctionDuration {
            duration: values.iter().sum::<f64>() / values.len() as f64,
            name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str, value: f64) -> ServiceInvocationDatapoint {
        ServiceInvocationDatapoint {
            timestamp: 0,
            service_name: name.into(),
            value,
        }
    }

    fn func(service: &str, function: &str, value: f64) -> FunctionDurationDatapoint {
        FunctionDurationDatapoint {
            timestamp: 0,
            service_name: service.into(),
            function_name: function.into(),
            value,
        }
    }

    #[test]
    fn test_service_invocations_grouped() {
        let stats = fold_service_invocations(&[svc("A", 10.0), svc("A", 5.0), svc("B", 3.0)]);

        assert_eq!(stats.total_invocations, 18);
        assert_eq!(stats.services.len(), 2);
        assert_eq!(stats.invocations_of("A"), Some(15));
        assert_eq!(stats.invocations_of("B"), Some(3));
    }

    #[test]
    fn test_values_truncated_per_datapoint() {
        let stats = fold_service_invocations(&[svc("A", 1.9), svc("A", 1.9), svc("B", 0.5)]);

        assert_eq!(stats.invocations_of("A"), Some(2));
        assert_eq!(stats.invocations_of("B"), Some(0));
        assert_eq!(stats.total_invocations, 2);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let stats = fold_service_invocations(&[svc("A", 1e19), svc("A", 1e19), svc("B", 1e19)]);

        assert_eq!(stats.invocations_of("A"), Some(i64::MAX));
        assert_eq!(stats.invocations_of("B"), Some(i64::MAX));
        assert_eq!(stats.total_invocations, i64::MAX);
    }

    #[test]
    fn test_total_matches_service_sum() {
        let points: Vec<_> = (0..50)
            .map(|i| svc(&format!("svc-{}", i % 7), i as f64 * 1.25))
            .collect();
        let stats = fold_service_invocations(&points);

        let sum: i64 = stats.services.iter().map(|s| s.invocations).sum();
        assert_eq!(sum, stats.total_invocations);
        assert_eq!(stats.services.len(), 7);
    }

    #[test]
    fn test_services_sorted_by_name() {
        let stats = fold_service_invocations(&[svc("zeta", 1.0), svc("alpha", 1.0), svc("mid", 1.0)]);
        let names: Vec<_> = stats.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_function_mean() {
        let durations = fold_function_durations(&[func("S", "F", 10.0), func("S", "F", 20.0)]);

        assert_eq!(durations.len(), 1);
        assert_eq!(durations[0].name, "S/F");
        assert_eq!(durations[0].duration, 15.0);
    }

    #[test]
    fn test_function_key_includes_service() {
        let durations = fold_function_durations(&[
            func("S1", "handler", 4.0),
            func("S2", "handler", 8.0),
            func("S1", "handler", 6.0),
        ]);

        assert_eq!(durations.len(), 2);
        assert_eq!(durations[0].name, "S1/handler");
        assert_eq!(durations[0].duration, 5.0);
        assert_eq!(durations[1].name, "S2/handler");
        assert_eq!(durations[1].duration, 8.0);
    }

    #[test]
    fn test_empty_input() {
        let stats = fold_service_invocations(&[]);
        assert_eq!(stats.total_invocations, 0);
        assert!(stats.services.is_empty());

        assert!(fold_function_durations(&[]).is_empty());
    }
}
