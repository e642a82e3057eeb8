//! Make/unmake and hashing invariants over whole move trees.

use gambit_core::{Color, Move, Position, generate_all_legal, perft, zobrist};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const PROMOTIONS: &str = "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1";

const EN_PASSANT: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/// Visit every node to `depth`, checking each make/unmake bracket.
fn walk(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in generate_all_legal(pos) {
        let before = pos.clone();
        let undo = pos.make(mv);

        assert_eq!(pos.hash(), zobrist::hash(pos), "hash drift after {mv} in {before}");
        assert_eq!(
            pos.side(Color::White) | pos.side(Color::Black),
            pos.occupied(),
            "aggregates after {mv}"
        );
        assert!(pos.validate().is_ok(), "invalid position after {mv} in {before}");
        assert!(
            !gambit_core::attacks::is_in_check(pos, before.side_to_move()),
            "{mv} leaves the king in check"
        );

        nodes += walk(pos, depth - 1);
        pos.unmake(&undo);
        assert_eq!(*pos, before, "unmake after {mv}");
    }
    nodes
}

#[test]
fn round_trip_from_reference_positions() {
    for (fen, depth) in [
        (gambit_core::STARTING_FEN, 3),
        (KIWIPETE, 2),
        (PROMOTIONS, 3),
        (EN_PASSANT, 3),
    ] {
        let mut pos: Position = fen.parse().unwrap();
        let walked = walk(&mut pos, depth);
        let mut fresh: Position = fen.parse().unwrap();
        assert_eq!(walked, perft(&mut fresh, depth), "{fen}");
    }
}

#[test]
fn move_order_does_not_change_the_hash() {
    let start = Position::starting_position();
    let play = |moves: &[&str]| {
        moves.iter().fold(start.clone(), |pos, text| {
            let mv: Move = pos.parse_move(text).unwrap();
            pos.with_move(mv)
        })
    };

    let a = play(&["g1f3", "g8f6", "b1c3", "b8c6"]);
    let b = play(&["b1c3", "b8c6", "g1f3", "g8f6"]);
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.to_fen(), b.to_fen());

    // Same placement, different side to move.
    let c = play(&["g1f3", "g8f6", "b1c3"]);
    let d = play(&["b1c3", "g8f6", "g1f3"]);
    assert_eq!(c.hash(), d.hash());
    assert_ne!(c.hash(), a.hash());
}

#[test]
fn fen_survives_a_played_line() {
    let mut pos: Position = KIWIPETE.parse().unwrap();
    for text in ["e1g1", "h3g2", "e5f7", "g2f1q"] {
        let mv = pos.parse_move(text).unwrap();
        pos = pos.with_move(mv);
        let reparsed: Position = pos.to_fen().parse().unwrap();
        assert_eq!(reparsed, pos, "{}", pos.to_fen());
        assert_eq!(reparsed.hash(), pos.hash());
    }
}
