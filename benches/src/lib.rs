use graph_sig::prelude::*;

/// A cycle through the vertices `1..=vertex_count` with `edge_count` labelled edges around it
pub fn graph_with_edges(vertex_count: usize, edge_count: usize, label_count: usize) -> Graph {
    let mut graph = Graph::new();
    for j in 1..=vertex_count {
        graph.add_vertex(j, vec![(j % label_count) + 1]);
    }
    for k in 0..edge_count {
        graph.add_edge(
            (k % vertex_count) + 1,
            ((k + 1) % vertex_count) + 1,
            vec![(k % label_count) + 1],
        );
    }
    graph
}

#[macro_export]
macro_rules! setup_graphs {
    ($key_pair: ident, $edge_count_range: ident, $graphs_range: ident, $messages_range: ident) => {
        // Hardcoding edge counts. This should ideally be taken/updated from command line input
        let $edge_count_range = [1, 2, 4, 8, 12];
        let graph_params = &$key_pair.public_key.graph_params;
        let $graphs_range = $edge_count_range
            .iter()
            .map(|c| {
                benches::graph_with_edges(
                    graph_params.l_V as usize,
                    *c,
                    graph_params.l_L as usize,
                )
            })
            .collect::<Vec<_>>();
        let $messages_range = $graphs_range
            .iter()
            .map(|g| GraphEncoder::new(&$key_pair.public_key).encode(g).unwrap())
            .collect::<Vec<_>>();
    };
}
