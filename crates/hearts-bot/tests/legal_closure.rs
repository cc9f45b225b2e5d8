use hearts_bot::{PolicyContext, registered_strategies};
use hearts_core::game::deal::LocalShuffle;
use hearts_core::model::player::Seat;
use hearts_core::model::score::ScoreBoard;
use hearts_core::{Game, GamePhase, PlayOutcome};

/// Plays one game with the same strategy in every seat. Every choice must be
/// accepted by the engine.
fn play_out(strategy_index: usize, number: u32, seed: u64) -> Game {
    let factory = &registered_strategies()[strategy_index];
    let mut policies: Vec<_> = (0..4u64)
        .map(|offset| (factory.make)(Some(seed.wrapping_add(offset))))
        .collect();
    let scores = ScoreBoard::from_totals([12, 40, 7, 33]);
    let mut game = Game::new(number, Some(seed));
    game.deal(&LocalShuffle).unwrap();

    if game.phase() == GamePhase::Passing {
        for seat in Seat::LOOP {
            let ctx = PolicyContext::from_game(&game, seat, &scores);
            let cards = policies[seat.index()]
                .choose_pass(&ctx)
                .unwrap_or_else(|| panic!("{} offered no pass", factory.id));
            game.submit_pass(seat, &cards)
                .unwrap_or_else(|err| panic!("{} passed {cards:?}: {err}", factory.id));
        }
    }
    assert_eq!(game.phase(), GamePhase::FirstTrick);

    let mut plays = 0;
    while let Some(seat) = game.whose_turn() {
        let ctx = PolicyContext::from_game(&game, seat, &scores);
        let card = policies[seat.index()]
            .choose_play(&ctx)
            .unwrap_or_else(|| panic!("{} offered no play", factory.id));
        assert!(ctx.legal.contains(&card), "{} chose illegal {card}", factory.id);
        drop(ctx);
        plays += 1;
        let outcome = game
            .play_card(seat, card)
            .unwrap_or_else(|err| panic!("{} played {card}: {err}", factory.id));
        if matches!(outcome, PlayOutcome::GameCompleted { .. }) {
            break;
        }
    }
    assert_eq!(plays, 52);
    game
}

#[test]
fn every_strategy_finishes_passing_and_holding_games() {
    for index in 0..registered_strategies().len() {
        for (number, seed) in [(1, 11), (2, 12), (3, 13), (4, 14)] {
            let game = play_out(index, number, seed);
            assert_eq!(game.phase(), GamePhase::Result);
            assert_eq!(game.points().iter().sum::<u32>(), 26);
            assert!(Seat::LOOP.iter().all(|seat| game.hand(*seat).is_empty()));
        }
    }
}

#[test]
fn seeded_strategies_are_repeatable() {
    for index in 0..registered_strategies().len() {
        let first = play_out(index, 2, 404);
        let second = play_out(index, 2, 404);
        assert_eq!(first.points(), second.points());
        assert_eq!(first.passes(), second.passes());
    }
}
