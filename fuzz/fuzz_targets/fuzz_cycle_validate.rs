#![no_main]

use hexecho_core::{CellCoord, GridDims, HexGraph, Rejection, check_cycle, degree_classes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the grid (rows 4..=32 even, cols 3..=66).
    if data.len() < 2 {
        return;
    }
    let rows = u16::from(data[0] % 15) * 2 + 4;
    let cols = u16::from(data[1] % 64) + 3;
    let Ok(dims) = GridDims::new(rows, cols) else {
        panic!("derived dims {rows}x{cols} rejected");
    };
    let graph = HexGraph::new(dims);

    // Remaining bytes pairwise become cells, wrapped into range.
    let cells: Vec<CellCoord> = data[2..]
        .chunks_exact(2)
        .map(|p| CellCoord::new(u16::from(p[0]) % rows, u16::from(p[1]) % cols))
        .collect();

    let verdict = check_cycle(&cells, &graph);
    let classes = degree_classes(&cells, &graph);
    assert_eq!(classes.len(), cells.len());

    match verdict {
        Ok(()) => {
            assert!(cells.len() >= 4);
            for i in 0..cells.len() {
                assert!(graph.are_neighbors(cells[i], cells[(i + 1) % cells.len()]));
            }
            // Reversal never changes the verdict.
            let mut reversed = cells.clone();
            reversed.reverse();
            assert_eq!(check_cycle(&reversed, &graph), Ok(()));
        }
        Err(Rejection::TooShort { len }) => assert!(len < 4),
        Err(Rejection::Broken { index })
        | Err(Rejection::Revisit { index })
        | Err(Rejection::WrongDegree { index, .. }) => assert!(index < cells.len()),
    }
});
