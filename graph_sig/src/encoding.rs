//! Encoding of labelled graphs as exponents of the extended key's bases.
//!
//! Vertex `j` with labels `L` is encoded on `R_j` as `p_j * prod_{l in L} q_l` where `p_j` is the vertex's
//! representative and `q_l` the label's. The `k`-th edge from `i` to `j` with labels `L` is encoded on
//! `R_{l_V + k}` as `p_i * p_j * prod_{l in L} q_l`. Since representatives are distinct primes, an exponent
//! determines its vertex or edge and labels.

use crate::{
    base_representation::{BaseCollection, BaseRepresentation, BaseType},
    error::GraphSigError,
    extended_keys::ExtendedPublicKey,
};
use ark_std::{collections::BTreeSet, vec::Vec};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphVertex {
    /// In `1..=l_V`
    pub id: usize,
    /// Each in `1..=l_L`
    pub labels: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub labels: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub vertices: Vec<GraphVertex>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, id: usize, labels: Vec<usize>) -> &mut Self {
        self.vertices.push(GraphVertex { id, labels });
        self
    }

    pub fn add_edge(&mut self, from: usize, to: usize, labels: Vec<usize>) -> &mut Self {
        self.edges.push(GraphEdge { from, to, labels });
        self
    }
}

pub struct GraphEncoder<'a> {
    public_key: &'a ExtendedPublicKey,
}

impl<'a> GraphEncoder<'a> {
    pub fn new(public_key: &'a ExtendedPublicKey) -> Self {
        Self { public_key }
    }

    /// One base per vertex followed by one base per edge, in the order of the graph
    pub fn encode(&self, graph: &Graph) -> Result<BaseCollection, GraphSigError> {
        let graph_params = &self.public_key.graph_params;
        if graph.edges.len() > graph_params.l_E as usize {
            return Err(GraphSigError::TooManyEdges(graph.edges.len()));
        }
        let mut bases = BaseCollection::new();
        let mut seen = BTreeSet::new();
        for vertex in &graph.vertices {
            if !seen.insert(vertex.id) {
                return Err(GraphSigError::DuplicateVertex(vertex.id));
            }
            let exponent = self.vertex_exponent(vertex.id, &vertex.labels)?;
            bases.add(BaseRepresentation::from_key(
                self.public_key,
                BaseType::Vertex,
                vertex.id,
                exponent,
            )?);
        }
        for (k, edge) in graph.edges.iter().enumerate() {
            for endpoint in [edge.from, edge.to] {
                if !seen.contains(&endpoint) {
                    return Err(GraphSigError::UnknownEdgeEndpoint(endpoint));
                }
            }
            let exponent = self.edge_exponent(edge.from, edge.to, &edge.labels)?;
            bases.add(BaseRepresentation::from_key(
                self.public_key,
                BaseType::Edge,
                graph_params.first_edge_index() + k,
                exponent,
            )?);
        }
        Ok(bases)
    }

    /// `p_j * prod q_l`
    pub fn vertex_exponent(&self, id: usize, labels: &[usize]) -> Result<BigInt, GraphSigError> {
        let p = self.vertex_representative(id)?;
        self.checked_exponent(p.clone(), labels)
    }

    /// `p_from * p_to * prod q_l`
    pub fn edge_exponent(
        &self,
        from: usize,
        to: usize,
        labels: &[usize],
    ) -> Result<BigInt, GraphSigError> {
        let p = self.vertex_representative(from)? * self.vertex_representative(to)?;
        self.checked_exponent(p, labels)
    }

    fn vertex_representative(&self, id: usize) -> Result<&BigUint, GraphSigError> {
        self.public_key
            .vertex_representative(id)
            .ok_or(GraphSigError::VertexOutOfRange(id))
    }

    fn checked_exponent(&self, base: BigUint, labels: &[usize]) -> Result<BigInt, GraphSigError> {
        let mut exponent = base;
        for l in labels {
            let q = self
                .public_key
                .label_representative(*l)
                .ok_or(GraphSigError::LabelOutOfRange(*l))?;
            exponent *= q;
        }
        let bits = exponent.bits();
        if bits > self.public_key.signer_key.params.l_m as u64 {
            return Err(GraphSigError::ExponentTooLong(bits));
        }
        Ok(BigInt::from(exponent))
    }
}

/// Returns true if the representative `p` divides `exponent`
pub fn has_factor(exponent: &BigInt, p: &BigUint) -> bool {
    !p.is_one() && (exponent.magnitude() % p) == BigUint::default()
}
