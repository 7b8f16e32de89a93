// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Discovery of settings specifications reachable from a set of candidates.

use crate::errors::{SettingsError, SettingsResult};
use crate::loader::{ExecutorSpecification, WorkerLoader, SETTINGS};
use crate::observability::messages::settings::{
    DuplicateSettingsName, SettingsCycleDetected, SmartSearchCompleted, SmartSearchIncomplete,
};
use crate::observability::messages::StructuredLog;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const NOT_PROCESSED: &str = "Smart search has not been performed yet";

/// Supplies the ids the search starts from.
pub type CandidateSupplier = Box<dyn Fn() -> Vec<String> + Send + Sync>;

/// Sub-settings reference whose target is not a registered settings specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub parent_id: String,
    pub control: String,
    /// The referenced `settings_id`, or the control name for name-based references.
    pub target: String,
}

impl Display for UnresolvedReference {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}.{} -> {}", self.parent_id, self.control, self.target)
    }
}

#[derive(Debug, Default)]
struct SearchResult {
    all_settings: BTreeMap<String, Arc<ExecutorSpecification>>,
    children: BTreeMap<String, Vec<String>>,
    unresolved: Vec<UnresolvedReference>,
    has_duplicates: bool,
}

/// Finds every settings specification reachable from the candidate ids.
///
/// Candidates that are unknown or are not settings specifications are
/// ignored. From each settings specification the search follows its
/// sub-settings controls transitively, recording the parent/child relation
/// and every reference it cannot resolve.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_chainworks::loader::{ControlSpecification, ExecutorSpecification, WorkerLoader};
/// use the_chainworks::settings::SmartSearchSettings;
///
/// let loader = Arc::new(WorkerLoader::new());
/// loader.register(
///     "blur",
///     ExecutorSpecification::new("blur", "Blur")
///         .with_settings_role("blur")
///         .with_control(ControlSpecification::sub_settings("kernel", None)),
/// );
/// loader.register(
///     "kernel",
///     ExecutorSpecification::new("kernel", "Kernel").with_settings_role("kernel"),
/// );
///
/// let mut search = SmartSearchSettings::new(Arc::clone(&loader), || vec!["blur".to_string()]);
/// assert!(search.all_settings().is_err());
///
/// search.process().unwrap();
/// assert!(search.is_complete());
/// assert_eq!(search.children().unwrap()["blur"], vec!["kernel"]);
/// ```
pub struct SmartSearchSettings {
    specifications: Arc<WorkerLoader<ExecutorSpecification>>,
    candidates: CandidateSupplier,
    result: Option<SearchResult>,
}

impl SmartSearchSettings {
    pub fn new(
        specifications: Arc<WorkerLoader<ExecutorSpecification>>,
        candidates: impl Fn() -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            specifications,
            candidates: Box::new(candidates),
            result: None,
        }
    }

    /// Search starting from [`probable_settings_ids`] of the loader.
    pub fn for_loader(specifications: Arc<WorkerLoader<ExecutorSpecification>>) -> Self {
        let source = Arc::clone(&specifications);
        Self::new(specifications, move || probable_settings_ids(&source))
    }

    /// Runs the search, replacing any earlier result.
    ///
    /// # Errors
    /// [`SettingsError::Cycle`] when sub-settings references form a cycle.
    pub fn process(&mut self) -> SettingsResult<()> {
        let by_name = self.settings_by_name();
        let mut result = SearchResult::default();
        let mut queue = VecDeque::new();

        for id in (self.candidates)() {
            if let Some(specification) = self.settings_specification(&id) {
                if !result.all_settings.contains_key(&id) {
                    result.all_settings.insert(id.clone(), specification);
                    queue.push_back(id);
                }
            }
        }

        while let Some(parent_id) = queue.pop_front() {
            let Some(parent) = result.all_settings.get(&parent_id).cloned() else {
                continue;
            };
            let mut children = Vec::new();
            for control in parent.controls() {
                if !control.is_sub_settings() {
                    continue;
                }
                let child = match &control.settings_id {
                    Some(id) => self.settings_specification(id),
                    None => by_name
                        .get(&control.name)
                        .and_then(|id| self.settings_specification(id)),
                };
                let Some(child) = child else {
                    result.unresolved.push(UnresolvedReference {
                        parent_id: parent_id.clone(),
                        target: control.settings_id.clone().unwrap_or_else(|| control.name.clone()),
                        control: control.name,
                    });
                    continue;
                };
                let child_id = child.id().to_string();
                if !children.contains(&child_id) {
                    children.push(child_id.clone());
                }
                if !result.all_settings.contains_key(&child_id) {
                    result.all_settings.insert(child_id.clone(), child);
                    queue.push_back(child_id);
                }
            }
            result.children.insert(parent_id, children);
        }

        if let Some(cycle) = find_cycle(&result.children) {
            SettingsCycleDetected { cycle: &cycle }.log();
            return Err(SettingsError::Cycle { cycle });
        }

        result.has_duplicates = report_duplicate_names(&result.all_settings);

        SmartSearchCompleted {
            settings_count: result.all_settings.len(),
            unresolved_count: result.unresolved.len(),
            has_duplicates: result.has_duplicates,
        }
        .log();
        if !result.unresolved.is_empty() {
            let unresolved: Vec<String> = result.unresolved.iter().map(|r| r.to_string()).collect();
            SmartSearchIncomplete {
                unresolved: &unresolved,
            }
            .log();
        }

        self.result = Some(result);
        Ok(())
    }

    pub fn is_processed(&self) -> bool {
        self.result.is_some()
    }

    /// Settings specifications found, keyed by id.
    pub fn all_settings(&self) -> SettingsResult<&BTreeMap<String, Arc<ExecutorSpecification>>> {
        Ok(&self.processed()?.all_settings)
    }

    /// Direct sub-settings of every found specification, in control order.
    pub fn children(&self) -> SettingsResult<&BTreeMap<String, Vec<String>>> {
        Ok(&self.processed()?.children)
    }

    pub fn unresolved(&self) -> SettingsResult<&[UnresolvedReference]> {
        Ok(&self.processed()?.unresolved)
    }

    /// `true` when the search ran and every reference was resolved.
    pub fn is_complete(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.unresolved.is_empty())
    }

    /// `true` when the search ran and two found specifications share a settings name.
    pub fn has_duplicates(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.has_duplicates)
    }

    fn processed(&self) -> SettingsResult<&SearchResult> {
        self.result
            .as_ref()
            .ok_or(SettingsError::IllegalState(NOT_PROCESSED))
    }

    fn settings_specification(&self, id: &str) -> Option<Arc<ExecutorSpecification>> {
        self.specifications
            .get(id)
            .filter(|specification| specification.is_role_settings())
    }

    /// Settings name -> id of the first registered settings specification (in id order).
    fn settings_by_name(&self) -> HashMap<String, String> {
        let mut by_name = HashMap::new();
        for (id, specification) in self.specifications.entries() {
            if let Some(name) = specification.settings_name() {
                by_name.entry(name.to_string()).or_insert(id);
            }
        }
        by_name
    }
}

/// Ids whose serialized specification mentions `"settings"`.
///
/// A cheap pre-selection: it finds every settings specification, plus some
/// that only use sub-settings controls.
pub fn probable_settings_ids(specifications: &WorkerLoader<ExecutorSpecification>) -> Vec<String> {
    let marker = format!("\"{}\"", SETTINGS);
    specifications
        .entries()
        .into_iter()
        .filter(|(_, specification)| specification.serialized().contains(&marker))
        .map(|(id, _)| id)
        .collect()
}

fn report_duplicate_names(all_settings: &BTreeMap<String, Arc<ExecutorSpecification>>) -> bool {
    let mut first_by_name: HashMap<&str, &str> = HashMap::new();
    let mut has_duplicates = false;
    for (id, specification) in all_settings {
        let Some(name) = specification.settings_name() else {
            continue;
        };
        match first_by_name.get(name) {
            Some(&first_id) => {
                DuplicateSettingsName {
                    settings_name: name,
                    first_id,
                    second_id: id,
                }
                .log();
                has_duplicates = true;
            }
            None => {
                first_by_name.insert(name, id);
            }
        }
    }
    has_duplicates
}

fn find_cycle(children: &BTreeMap<String, Vec<String>>) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for id in children.keys() {
        if !visited.contains(id) {
            if let Some(cycle) = dfs_cycle_detection(id, children, &mut visited, &mut rec_stack, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

/// Three-color depth-first search; returns the cycle path closed by its back edge.
fn dfs_cycle_detection(
    node: &str,
    graph: &BTreeMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = graph.get(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor) {
                let cycle_start = path.iter().position(|x| x == neighbor).unwrap_or(0);
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor.clone());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ControlSpecification;

    fn settings(id: &str, children: &[(&str, Option<&str>)]) -> ExecutorSpecification {
        children.iter().fold(
            ExecutorSpecification::new(id, id).with_settings_role(id),
            |specification, (control, settings_id)| {
                specification.with_control(ControlSpecification::sub_settings(
                    *control,
                    settings_id.map(str::to_string),
                ))
            },
        )
    }

    fn loader(specifications: Vec<ExecutorSpecification>) -> Arc<WorkerLoader<ExecutorSpecification>> {
        let loader = Arc::new(WorkerLoader::new());
        for specification in specifications {
            loader.register(specification.id().to_string(), specification);
        }
        loader
    }

    fn search_from(loader: &Arc<WorkerLoader<ExecutorSpecification>>, ids: &[&str]) -> SmartSearchSettings {
        let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        SmartSearchSettings::new(Arc::clone(loader), move || ids.clone())
    }

    #[test]
    fn test_queries_before_process() {
        let search = search_from(&loader(vec![]), &[]);
        for error in [
            search.all_settings().err(),
            search.children().err(),
            search.unresolved().err(),
        ] {
            assert!(matches!(
                error,
                Some(SettingsError::IllegalState("Smart search has not been performed yet"))
            ));
        }
        assert!(!search.is_processed());
        assert!(!search.is_complete());
        assert!(!search.has_duplicates());
    }

    #[test]
    fn test_transitive_chain() {
        struct TestCase {
            name: &'static str,
            a_extra: Vec<(&'static str, Option<&'static str>)>,
            complete: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "all references resolved",
                a_extra: vec![],
                complete: true,
            },
            TestCase {
                name: "unknown settings id",
                a_extra: vec![("ghost", Some("unknown"))],
                complete: false,
            },
            TestCase {
                name: "unknown settings name",
                a_extra: vec![("nobody", None)],
                complete: false,
            },
        ];

        for tc in test_cases {
            // A -> B by id, B -> C by name
            let mut a_controls = vec![("b", Some("B"))];
            a_controls.extend(tc.a_extra);
            let loader = loader(vec![
                settings("A", &a_controls),
                settings("B", &[("C", None)]),
                settings("C", &[]),
                settings("unrelated", &[]),
            ]);
            let mut search = search_from(&loader, &["A", "missing"]);
            search.process().unwrap();

            let found: Vec<&String> = search.all_settings().unwrap().keys().collect();
            assert_eq!(found, vec!["A", "B", "C"], "case: {}", tc.name);
            let children = search.children().unwrap();
            assert_eq!(children["A"], vec!["B"], "case: {}", tc.name);
            assert_eq!(children["B"], vec!["C"], "case: {}", tc.name);
            assert!(children["C"].is_empty(), "case: {}", tc.name);
            assert_eq!(search.is_complete(), tc.complete, "case: {}", tc.name);
            assert_eq!(search.unresolved().unwrap().len(), usize::from(!tc.complete));
        }
    }

    #[test]
    fn test_unresolved_reference_display() {
        let loader = loader(vec![settings("A", &[("ghost", Some("unknown"))])]);
        let mut search = search_from(&loader, &["A"]);
        search.process().unwrap();
        assert_eq!(search.unresolved().unwrap()[0].to_string(), "A.ghost -> unknown");
    }

    #[test]
    fn test_cycle_fails() {
        let loader = loader(vec![
            settings("A", &[("b", Some("B"))]),
            settings("B", &[("c", Some("C"))]),
            settings("C", &[("a", Some("A"))]),
        ]);
        let mut search = search_from(&loader, &["A"]);

        match search.process() {
            Err(SettingsError::Cycle { cycle }) => assert_eq!(cycle, vec!["A", "B", "C", "A"]),
            other => panic!("expected a cycle, got {:?}", other.err()),
        }
        assert!(!search.is_processed());
    }

    #[test]
    fn test_duplicate_settings_names() {
        let loader = loader(vec![
            ExecutorSpecification::new("x1", "X").with_settings_role("x"),
            ExecutorSpecification::new("x2", "X").with_settings_role("x"),
        ]);
        let mut search = search_from(&loader, &["x1", "x2"]);
        search.process().unwrap();
        assert!(search.has_duplicates());
        assert!(search.is_complete());
    }

    #[test]
    fn test_probable_settings_ids() {
        let loader = loader(vec![
            settings("s", &[]),
            ExecutorSpecification::new("plain", "Plain"),
            ExecutorSpecification::new("user", "User")
                .with_control(ControlSpecification::sub_settings("s", None)),
        ]);
        assert_eq!(probable_settings_ids(&loader), vec!["s", "user"]);

        let mut search = SmartSearchSettings::for_loader(Arc::clone(&loader));
        search.process().unwrap();
        let found: Vec<&String> = search.all_settings().unwrap().keys().collect();
        assert_eq!(found, vec!["s"]);
    }
}
