//! Exclusion filter.

use std::collections::BTreeSet;

use snooze_core::Workload;

/// Keep the workloads whose name is not in `exclusions`, preserving order.
pub fn filter_excluded(workloads: Vec<Workload>, exclusions: &BTreeSet<String>) -> Vec<Workload> {
    workloads
        .into_iter()
        .filter(|w| !exclusions.contains(&w.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(workloads: &[Workload]) -> Vec<&str> {
        workloads.iter().map(|w| w.name.as_str()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn removes_only_excluded_names_in_order() {
        let workloads = vec![
            Workload::new("team-a", "web", 0),
            Workload::new("team-a", "nginx-ingress-controller", 1),
            Workload::new("team-a", "worker", 0),
            Workload::new("team-a", "api", 2),
        ];
        let kept = filter_excluded(workloads, &set(&["nginx-ingress-controller", "missing"]));
        assert_eq!(names(&kept), vec!["web", "worker", "api"]);
    }

    #[test]
    fn empty_exclusions_keep_everything() {
        let workloads = vec![Workload::new("ns", "b", 0), Workload::new("ns", "a", 0)];
        let kept = filter_excluded(workloads.clone(), &BTreeSet::new());
        assert_eq!(kept, workloads);
    }

    #[test]
    fn all_excluded_yields_empty() {
        let workloads = vec![Workload::new("ns", "a", 0)];
        assert!(filter_excluded(workloads, &set(&["a"])).is_empty());
    }

    #[test]
    fn match_is_exact() {
        let workloads = vec![Workload::new("ns", "web-v2", 0)];
        let kept = filter_excluded(workloads, &set(&["web"]));
        assert_eq!(names(&kept), vec!["web-v2"]);
    }
}
