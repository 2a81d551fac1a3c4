//! Device topology and SWAP routing.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;
use tracing::debug;

use alsvid_ir::{Instruction, IrError, Isa, QubitId, Symbol};

use crate::error::{CompileError, CompileResult};

/// Structural classes of device connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    /// A single chain of qubits, numbered outward from the readout
    /// resonator.
    Linear,
}

impl TopologyKind {
    /// Parse a topology type name from configuration.
    pub fn from_name(name: &str) -> CompileResult<Self> {
        match name {
            "linear" => Ok(TopologyKind::Linear),
            other => Err(CompileError::BadTopologyType(format!(
                "unknown topology type '{other}'"
            ))),
        }
    }

    /// Configuration spelling of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            TopologyKind::Linear => "linear",
        }
    }
}

/// Connectivity graph over the physical qubits of a QPU.
///
/// Built once from configuration at QPU handle initialization and
/// read-only afterwards. Construction applies the exclusion filter and
/// then checks the structural invariant of the declared kind.
#[derive(Debug, Clone)]
pub struct Topology {
    kind: TopologyKind,
    graph: UnGraph<u32, ()>,
    nodes: FxHashMap<u32, NodeIndex>,
}

impl Topology {
    /// Build a topology from its configuration pieces.
    ///
    /// Excluded indices are removed. In linear mode every index at or
    /// beyond the smallest exclusion is removed as well: qubits number
    /// outward from the readout resonator, so any exclusion truncates
    /// the usable tail. Couplings touching removed indices are dropped.
    pub fn new(
        kind: &str,
        qubits: &[u32],
        couplings: &[(u32, u32)],
        exclusions: &[u32],
    ) -> CompileResult<Self> {
        let kind = TopologyKind::from_name(kind)?;

        let cutoff = match (kind, exclusions.iter().min()) {
            (TopologyKind::Linear, Some(&min)) => Some(min),
            _ => None,
        };
        let keep = |q: u32| -> bool {
            if exclusions.contains(&q) {
                return false;
            }
            match cutoff {
                Some(c) => q < c,
                None => true,
            }
        };

        let mut graph = UnGraph::new_undirected();
        let mut nodes = FxHashMap::default();
        let mut kept: Vec<u32> = qubits.iter().copied().filter(|&q| keep(q)).collect();
        kept.sort_unstable();
        kept.dedup();
        for q in &kept {
            nodes.insert(*q, graph.add_node(*q));
        }

        for &(a, b) in couplings {
            let (Some(&na), Some(&nb)) = (nodes.get(&a), nodes.get(&b)) else {
                continue;
            };
            if graph.find_edge(na, nb).is_none() {
                graph.add_edge(na, nb, ());
            }
        }

        let topology = Self { kind, graph, nodes };
        topology.check_invariant()?;
        debug!(
            kind = kind.name(),
            qubits = topology.graph.node_count(),
            couplings = topology.graph.edge_count(),
            "topology constructed"
        );
        Ok(topology)
    }

    /// Declared structural kind.
    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    /// Physical qubit indices, ascending. This is the order the
    /// mapping consumes.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<u32> = self.nodes.keys().copied().collect();
        qubits.sort_unstable();
        qubits.into_iter().map(QubitId).collect()
    }

    /// Whether a physical index survives in the filtered graph.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.nodes.contains_key(&qubit.0)
    }

    /// Whether two physical qubits share a coupling.
    pub fn has_edge(&self, a: QubitId, b: QubitId) -> bool {
        match (self.nodes.get(&a.0), self.nodes.get(&b.0)) {
            (Some(&na), Some(&nb)) => self.graph.find_edge(na, nb).is_some(),
            _ => false,
        }
    }

    /// Shortest path between two physical qubits, endpoints included.
    ///
    /// Breadth-first search visiting neighbors in ascending index
    /// order, so ties break deterministically toward the lowest
    /// neighboring index.
    pub fn shortest_path(&self, from: QubitId, to: QubitId) -> Option<Vec<QubitId>> {
        let start = *self.nodes.get(&from.0)?;
        let goal = *self.nodes.get(&to.0)?;
        if start == goal {
            return Some(vec![from]);
        }

        let mut previous: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        let mut queue = std::collections::VecDeque::new();
        previous.insert(start, start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(current).collect();
            neighbors.sort_by_key(|&n| self.graph[n]);
            for neighbor in neighbors {
                if previous.contains_key(&neighbor) {
                    continue;
                }
                previous.insert(neighbor, current);
                if neighbor == goal {
                    let mut path = vec![goal];
                    let mut node = goal;
                    while node != start {
                        node = previous[&node];
                        path.push(node);
                    }
                    path.reverse();
                    return Some(path.into_iter().map(|n| QubitId(self.graph[n])).collect());
                }
                queue.push_back(neighbor);
            }
        }

        None
    }

    /// Insert the SWAPs a two-qubit instruction needs to become local.
    ///
    /// One-qubit instructions, measure, and reset pass through
    /// untouched. A two-qubit instruction on coupled operands passes
    /// through as well. Otherwise the control-side operand walks the
    /// shortest path up to the neighbor of its partner, the routed copy
    /// fires there, and the walk is mirrored to restore the register.
    pub fn swaps(&self, instruction: &Instruction, isa: &Isa) -> CompileResult<Vec<Instruction>> {
        if matches!(instruction.symbol, Symbol::Measure | Symbol::Reset)
            || instruction.operand_count() == 1
        {
            return Ok(vec![instruction.clone()]);
        }

        if !instruction.is_two_qubit() {
            return Err(IrError::MalformedInstruction {
                symbol: instruction.symbol,
                cause: format!(
                    "routing requires one or two operands, got {}",
                    instruction.operand_count()
                ),
            }
            .into());
        }

        // The control side moves; the target anchors. SWAP stores its
        // operands as one-in-controls, one-in-targets, so the same rule
        // covers it.
        let (mover, anchor) = if instruction.control_qubits.is_empty() {
            (instruction.target_qubits[0], instruction.target_qubits[1])
        } else {
            (instruction.control_qubits[0], instruction.target_qubits[0])
        };

        if self.has_edge(mover, anchor) {
            return Ok(vec![instruction.clone()]);
        }

        let path = self
            .shortest_path(mover, anchor)
            .ok_or(CompileError::QubitsNotConnected {
                qa: mover,
                qb: anchor,
            })?;

        let hops = path.len() - 1;
        let mut routed = Vec::with_capacity(2 * (hops - 1) + 1);
        for window in path.windows(2).take(hops - 1) {
            routed.push(self.carried_swap(instruction, isa, window[0], window[1]));
        }

        let mut local = instruction.clone();
        let arrived = path[path.len() - 2];
        if local.control_qubits.is_empty() {
            local.target_qubits[0] = arrived;
        } else {
            local.control_qubits[0] = arrived;
        }
        routed.push(local);

        for window in path.windows(2).take(hops - 1).rev() {
            routed.push(self.carried_swap(instruction, isa, window[0], window[1]));
        }

        debug!(
            symbol = %instruction.symbol,
            mover = %mover,
            anchor = %anchor,
            swaps = 2 * (hops - 1),
            "routed non-local instruction"
        );

        Ok(routed)
    }

    /// A SWAP inserted by routing inherits the kind and mapping state
    /// of the instruction it carries.
    fn carried_swap(&self, carried: &Instruction, isa: &Isa, a: QubitId, b: QubitId) -> Instruction {
        let mut swap = isa.swap(a, b);
        swap.kind = carried.kind;
        swap.is_mapped = carried.is_mapped;
        swap
    }

    fn check_invariant(&self) -> CompileResult<()> {
        match self.kind {
            TopologyKind::Linear => self.check_linear(),
        }
    }

    /// Linear chain: non-empty, connected, |E| = |V| - 1, exactly two
    /// endpoints of degree 1 and every interior node of degree 2.
    fn check_linear(&self) -> CompileResult<()> {
        let n = self.graph.node_count();
        if n == 0 {
            return Err(CompileError::BadTopologyType(
                "linear topology has no usable qubits".into(),
            ));
        }
        if connected_components(&self.graph) != 1 {
            return Err(CompileError::BadTopologyType(
                "linear topology is not connected".into(),
            ));
        }
        if self.graph.edge_count() != n - 1 {
            return Err(CompileError::BadTopologyType(format!(
                "linear topology expects {} couplings, found {}",
                n - 1,
                self.graph.edge_count()
            )));
        }
        let degrees: Vec<usize> = self
            .graph
            .node_indices()
            .map(|i| self.graph.neighbors(i).count())
            .collect();
        let endpoints = degrees.iter().filter(|&&d| d == 1).count();
        let interior = degrees.iter().filter(|&&d| d == 2).count();
        if endpoints != 2 || interior != n - 2 {
            return Err(CompileError::BadTopologyType(
                "linear topology must form a single chain".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear4() -> Topology {
        Topology::new("linear", &[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)], &[]).unwrap()
    }

    fn isa() -> Isa {
        Isa::new("test")
    }

    #[test]
    fn test_valid_linear_topology() {
        let topo = linear4();
        assert_eq!(
            topo.qubits(),
            vec![QubitId(0), QubitId(1), QubitId(2), QubitId(3)]
        );
        assert!(topo.has_edge(QubitId(1), QubitId(2)));
        assert!(!topo.has_edge(QubitId(0), QubitId(3)));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Topology::new("nonsense", &[0, 1], &[(0, 1)], &[]).unwrap_err();
        assert!(matches!(err, CompileError::BadTopologyType(_)));
    }

    #[test]
    fn test_disconnected_chain_rejected() {
        let err = Topology::new("linear", &[0, 1, 2], &[(0, 1)], &[]).unwrap_err();
        assert!(matches!(err, CompileError::BadTopologyType(_)));
    }

    #[test]
    fn test_branching_chain_rejected() {
        // A star is connected with |E| = |V| - 1 but has a degree-3 hub.
        let err = Topology::new("linear", &[0, 1, 2, 3], &[(0, 1), (0, 2), (0, 3)], &[]).unwrap_err();
        assert!(matches!(err, CompileError::BadTopologyType(_)));
    }

    #[test]
    fn test_exclusion_truncates_tail() {
        // Excluding 2 on a linear device also drops everything beyond it.
        let topo = Topology::new("linear", &[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)], &[2]).unwrap();
        assert_eq!(topo.qubits(), vec![QubitId(0), QubitId(1)]);
        assert!(topo.has_edge(QubitId(0), QubitId(1)));
        assert!(!topo.contains(QubitId(3)));
    }

    #[test]
    fn test_shortest_path_deterministic() {
        let topo = linear4();
        let path = topo.shortest_path(QubitId(0), QubitId(3)).unwrap();
        assert_eq!(path, vec![QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        let trivial = topo.shortest_path(QubitId(2), QubitId(2)).unwrap();
        assert_eq!(trivial, vec![QubitId(2)]);
    }

    #[test]
    fn test_single_qubit_needs_no_swaps() {
        let topo = linear4();
        let instr = isa().single(Symbol::X, 1u32).unwrap();
        let routed = topo.swaps(&instr, &isa()).unwrap();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].symbol, Symbol::X);
    }

    #[test]
    fn test_measure_needs_no_swaps() {
        let topo = linear4();
        let instr = isa().measure(vec![QubitId(0), QubitId(3)]);
        let routed = topo.swaps(&instr, &isa()).unwrap();
        assert_eq!(routed.len(), 1);
    }

    #[test]
    fn test_adjacent_two_qubit_passes_through() {
        let topo = linear4();
        let instr = isa().controlled(Symbol::Cx, 0u32, 1u32).unwrap();
        let routed = topo.swaps(&instr, &isa()).unwrap();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].symbol, Symbol::Cx);
    }

    #[test]
    fn test_route_linear_swap_sandwich() {
        let topo = linear4();
        let instr = isa().controlled(Symbol::Cx, 0u32, 3u32).unwrap();
        let routed = topo.swaps(&instr, &isa()).unwrap();

        let shape: Vec<(Symbol, Vec<QubitId>, Vec<QubitId>)> = routed
            .iter()
            .map(|i| (i.symbol, i.control_qubits.clone(), i.target_qubits.clone()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Symbol::Swap, vec![QubitId(0)], vec![QubitId(1)]),
                (Symbol::Swap, vec![QubitId(1)], vec![QubitId(2)]),
                (Symbol::Cx, vec![QubitId(2)], vec![QubitId(3)]),
                (Symbol::Swap, vec![QubitId(1)], vec![QubitId(2)]),
                (Symbol::Swap, vec![QubitId(0)], vec![QubitId(1)]),
            ]
        );
    }

    #[test]
    fn test_removing_swaps_restores_instruction() {
        let topo = linear4();
        let instr = isa().controlled(Symbol::Cz, 0u32, 2u32).unwrap();
        let routed = topo.swaps(&instr, &isa()).unwrap();
        let kernel: Vec<&Instruction> = routed
            .iter()
            .filter(|i| i.symbol != Symbol::Swap)
            .collect();
        assert_eq!(kernel.len(), 1);
        assert_eq!(kernel[0].symbol, Symbol::Cz);
        // Anchor operand untouched; mover rewritten to the neighbor.
        assert_eq!(kernel[0].target_qubits, vec![QubitId(2)]);
        assert_eq!(kernel[0].control_qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_unreachable_pair_raises() {
        // Legal chains are always connected, so exercise the error
        // through indices missing from the graph entirely.
        let topo = Topology::new("linear", &[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)], &[3]).unwrap();
        let instr = isa().controlled(Symbol::Cx, 0u32, 3u32).unwrap();
        let err = topo.swaps(&instr, &isa()).unwrap_err();
        assert!(matches!(err, CompileError::QubitsNotConnected { .. }));
    }

    #[test]
    fn test_multi_operand_gate_malformed() {
        let topo = linear4();
        let instr = Instruction::new(
            Symbol::Cx,
            vec![QubitId(0), QubitId(1), QubitId(2)],
            vec![],
        );
        let err = topo.swaps(&instr, &isa()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Ir(IrError::MalformedInstruction { .. })
        ));
    }

    #[test]
    fn test_swap_instruction_itself_routes() {
        let topo = linear4();
        let instr = isa().swap(0u32, 2u32);
        let routed = topo.swaps(&instr, &isa()).unwrap();
        assert_eq!(routed.len(), 3);
        assert_eq!(routed[1].symbol, Symbol::Swap);
        assert_eq!(routed[1].control_qubits, vec![QubitId(1)]);
        assert_eq!(routed[1].target_qubits, vec![QubitId(2)]);
    }
}
