use super::{ValidationResult, Validator};
use crate::definitions::DefinitionMap;
use crate::errors::{error_codes, ContainerError};
use crate::matching::normalize_id;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Substitution,
    Parameter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Declared identifiers plus their substitution and parameter edges. Only
/// exactly declared identifiers become nodes.
struct ReferenceGraph<'a> {
    names: Vec<&'a str>,
    edges: Vec<Vec<(usize, EdgeKind)>>,
}

impl<'a> ReferenceGraph<'a> {
    fn build(definitions: &'a DefinitionMap) -> Self {
        let index: HashMap<String, usize> = definitions
            .keys()
            .enumerate()
            .map(|(i, id)| (normalize_id(id), i))
            .collect();
        let lookup = |id: &str| index.get(&normalize_id(id)).copied();

        let mut names = Vec::with_capacity(definitions.len());
        let mut edges = Vec::with_capacity(definitions.len());
        for (id, definition) in definitions {
            let mut out = Vec::new();
            if let Some(target) = definition.substitute_reference().and_then(lookup) {
                out.push((target, EdgeKind::Substitution));
            }
            out.extend(
                definition
                    .param_references()
                    .filter_map(lookup)
                    .map(|target| (target, EdgeKind::Parameter)),
            );
            names.push(id.as_str());
            edges.push(out);
        }

        Self { names, edges }
    }

    /// Iterative DFS from `root`. Each frame holds a node and the index of
    /// its next outgoing edge; `path` holds the edges taken to reach the top frame.
    fn visit(&self, root: usize, marks: &mut [Mark]) -> ValidationResult<()> {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        let mut path: Vec<(usize, EdgeKind)> = Vec::new();
        marks[root] = Mark::OnPath;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match self.edges[node].get(cursor) {
                Some(&(next, kind)) => {
                    frame.1 += 1;
                    match marks[next] {
                        Mark::Done => {}
                        Mark::OnPath => return Err(self.cycle_error(&path, node, next, kind)),
                        Mark::Unvisited => {
                            marks[next] = Mark::OnPath;
                            path.push((node, kind));
                            stack.push((next, 0));
                        }
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                    path.pop();
                }
            }
        }
        Ok(())
    }

    fn cycle_error(
        &self,
        path: &[(usize, EdgeKind)],
        from: usize,
        back_to: usize,
        closing: EdgeKind,
    ) -> ContainerError {
        let start = path
            .iter()
            .position(|&(node, _)| node == back_to)
            .unwrap_or(path.len());
        let mut cycle: Vec<(usize, EdgeKind)> = path[start..].to_vec();
        cycle.push((from, closing));

        let kind = if cycle.iter().all(|&(_, k)| k == EdgeKind::Substitution) {
            "substitution"
        } else if cycle.iter().all(|&(_, k)| k == EdgeKind::Parameter) {
            "parameter"
        } else {
            "mixed"
        };

        let mut chain: Vec<&str> = cycle.iter().map(|&(node, _)| self.names[node]).collect();
        chain.push(self.names[back_to]);

        ContainerError::configuration(
            error_codes::CIRCULAR_DEPENDENCY,
            format!("Circular {} dependency detected: {}", kind, chain.join(" -> ")),
        )
    }
}

/// **CYCLE VALIDATOR**
///
/// Depth-first search over substitution and `with_params` references in
/// registration order. The first closed chain found aborts validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleValidator;

impl CycleValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, definitions: &DefinitionMap) -> ValidationResult<()> {
        debug!("Checking {} definitions for reference cycles", definitions.len());
        let graph = ReferenceGraph::build(definitions);
        let mut marks = vec![Mark::Unvisited; graph.names.len()];

        for node in 0..graph.names.len() {
            if marks[node] == Mark::Unvisited {
                graph.visit(node, &mut marks)?;
            }
        }
        Ok(())
    }
}

impl Validator for CycleValidator {
    type Input = DefinitionMap;
    type Output = DefinitionMap;

    fn validate(&self, input: DefinitionMap) -> ValidationResult<DefinitionMap> {
        self.check(&input)?;
        Ok(input)
    }
}
