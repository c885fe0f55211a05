use super::*;

/// Builds the manager tree with an explicit worklist and cycle detection.
///
/// Every employee must either be a root or report to a known employee.
/// Nodes left unreached after walking down from the roots sit on a
/// reporting cycle and turn into a structural error.
pub(crate) fn build_hierarchy(employees: &[Employee]) -> AppResult<Vec<EmployeeNode>> {
    let mut by_id: BTreeMap<i32, &Employee> = BTreeMap::new();
    for employee in employees {
        by_id.insert(employee.employee_id(), employee);
    }

    let mut children: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    let mut roots: Vec<i32> = Vec::new();

    for employee in employees {
        match employee.reports_to() {
            None => roots.push(employee.employee_id()),
            Some(manager_id) => {
                if !by_id.contains_key(&manager_id) {
                    return Err(AppError::Internal(format!(
                        "employee '{}' reports to missing employee '{}'",
                        employee.employee_id(),
                        manager_id
                    )));
                }

                children
                    .entry(manager_id)
                    .or_default()
                    .push(employee.employee_id());
            }
        }
    }

    roots.sort_unstable();
    for ids in children.values_mut() {
        ids.sort_unstable();
    }

    // Walk down from the roots; the visit order doubles as a build order.
    let mut visit_order: Vec<i32> = Vec::with_capacity(employees.len());
    let mut worklist: Vec<i32> = roots.clone();
    while let Some(id) = worklist.pop() {
        visit_order.push(id);
        if let Some(child_ids) = children.get(&id) {
            worklist.extend(child_ids.iter().copied());
        }
    }

    if visit_order.len() < employees.len() {
        let reached: BTreeSet<i32> = visit_order.iter().copied().collect();
        let stranded = employees
            .iter()
            .map(|employee| employee.employee_id())
            .find(|id| !reached.contains(id))
            .unwrap_or(0);

        return Err(AppError::Internal(format!(
            "employee hierarchy contains a reporting cycle involving employee '{stranded}'"
        )));
    }

    // Assemble bottom-up: children are finished before their manager.
    let mut nodes: BTreeMap<i32, EmployeeNode> = BTreeMap::new();
    for id in visit_order.into_iter().rev() {
        let Some(employee) = by_id.get(&id) else {
            continue;
        };

        let reports = children
            .get(&id)
            .map(|child_ids| {
                child_ids
                    .iter()
                    .filter_map(|child_id| nodes.remove(child_id))
                    .collect()
            })
            .unwrap_or_default();

        nodes.insert(
            id,
            EmployeeNode {
                employee_id: id,
                name: format!("{} {}", employee.first_name(), employee.last_name()),
                title: employee.title().map(str::to_owned),
                reports,
            },
        );
    }

    Ok(roots
        .into_iter()
        .filter_map(|id| nodes.remove(&id))
        .collect())
}
