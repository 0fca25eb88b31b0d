//! Parsing of the PGN text embedded in chess.com game records

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use std::io::Cursor;
use std::ops::ControlFlow;

use crate::error::{Error, Result};

/// Header tags and mainline moves of one game
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub white_elo: Option<u16>,
    pub black_elo: Option<u16>,
    pub eco: Option<String>,
    pub time_control: Option<String>,
    pub termination: Option<String>,
    /// Starting position for variants such as chess960
    pub setup_fen: Option<String>,
    pub moves: Vec<String>,
    pub final_position: Chess,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Default)]
struct GameTags {
    event: Option<String>,
    site: Option<String>,
    date: Option<String>,
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
    white_elo: Option<u16>,
    black_elo: Option<u16>,
    eco: Option<String>,
    time_control: Option<String>,
    termination: Option<String>,
    fen: Option<String>,
}

struct GameMoves {
    tags: GameTags,
    moves: Vec<String>,
    current_position: Chess,
    success: bool,
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = GameTags;
    type Movetext = GameMoves;
    type Output = Option<PgnGame>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name_str = String::from_utf8_lossy(name);
        let value_str = value.decode_utf8_lossy().to_string();

        match name_str.as_ref() {
            "Event" => tags.event = Some(value_str),
            "Site" => tags.site = Some(value_str),
            "Date" => tags.date = Some(value_str),
            "White" => tags.white = Some(value_str),
            "Black" => tags.black = Some(value_str),
            "Result" => tags.result = Some(value_str),
            "WhiteElo" => tags.white_elo = value_str.parse().ok(),
            "BlackElo" => tags.black_elo = value_str.parse().ok(),
            "ECO" => tags.eco = Some(value_str),
            "TimeControl" => tags.time_control = Some(value_str),
            "Termination" => tags.termination = Some(value_str),
            "FEN" => tags.fen = Some(value_str),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        let start = match tags.fen.as_deref() {
            Some(fen) => match setup_position(fen) {
                Some(position) => position,
                None => return ControlFlow::Break(None),
            },
            None => Chess::default(),
        };

        ControlFlow::Continue(GameMoves {
            tags,
            moves: Vec::new(),
            current_position: start,
            success: true,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if !movetext.success {
            return ControlFlow::Continue(());
        }

        movetext.moves.push(san.san.to_string());

        match san.san.to_move(&movetext.current_position) {
            Ok(m) => match movetext.current_position.clone().play(m) {
                Ok(new_pos) => movetext.current_position = new_pos,
                Err(_) => movetext.success = false,
            },
            Err(_) => movetext.success = false,
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        if !movetext.success {
            return None;
        }

        let tags = movetext.tags;
        Some(PgnGame {
            event: tags.event,
            site: tags.site,
            date: tags.date,
            white: tags.white,
            black: tags.black,
            result: tags.result,
            white_elo: tags.white_elo,
            black_elo: tags.black_elo,
            eco: tags.eco,
            time_control: tags.time_control,
            termination: tags.termination,
            setup_fen: tags.fen,
            moves: movetext.moves,
            final_position: movetext.current_position,
        })
    }
}

fn setup_position(fen: &str) -> Option<Chess> {
    let fen: Fen = fen.parse().ok()?;
    fen.into_position(CastlingMode::Chess960).ok()
}

/// Parses a single game. Extra games after the first are ignored.
pub fn parse_game_pgn(pgn: &str) -> Result<PgnGame> {
    let mut parser = GameParser;
    let mut reader = pgn_reader::Reader::new(Cursor::new(pgn.as_bytes()));

    match reader.read_game(&mut parser) {
        Ok(Some(Some(game))) => Ok(game),
        Ok(Some(None)) => Err(Error::Pgn("illegal move or setup position".to_string())),
        Ok(None) => Err(Error::Pgn("no game found".to_string())),
        Err(e) => Err(Error::Pgn(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    const LIVE_GAME_PGN: &str = r#"[Event "Live Chess"]
[Site "Chess.com"]
[Date "2024.01.05"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[ECO "C60"]
[WhiteElo "1510"]
[BlackElo "1495"]
[TimeControl "180"]
[Termination "alice won by resignation"]

1. e4 {[%clk 0:02:59.9]} 1... e5 {[%clk 0:02:58.1]} 2. Nf3 {[%clk 0:02:57]} 2... Nc6 {[%clk 0:02:55]} 3. Bb5 {[%clk 0:02:50]} 1-0
"#;

    #[test]
    fn test_parse_live_game() {
        let game = parse_game_pgn(LIVE_GAME_PGN).unwrap();

        assert_eq!(game.white.as_deref(), Some("alice"));
        assert_eq!(game.black.as_deref(), Some("bob"));
        assert_eq!(game.result.as_deref(), Some("1-0"));
        assert_eq!(game.eco.as_deref(), Some("C60"));
        assert_eq!(game.time_control.as_deref(), Some("180"));
        assert_eq!(game.white_elo, Some(1510));
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(game.final_position.turn(), Color::Black);
    }

    #[test]
    fn test_illegal_move_is_error() {
        let pgn = "[Event \"Live Chess\"]\n\n1. e4 e5 2. Ke3 *\n";
        assert!(matches!(parse_game_pgn(pgn), Err(Error::Pgn(_))));
    }

    #[test]
    fn test_chess960_setup() {
        let pgn = r#"[Event "Live Chess - Chess960"]
[SetUp "1"]
[FEN "bqnbrkrn/pppppppp/8/8/8/8/PPPPPPPP/BQNBRKRN w EGeg - 0 1"]

1. d4 d5 *
"#;
        let game = parse_game_pgn(pgn).unwrap();
        assert_eq!(game.move_count(), 2);
        assert!(game.setup_fen.is_some());
    }
}
