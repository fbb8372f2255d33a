//! Noughts and crosses board.
//!
//! A small complete game used to drive the search end to end. Black plays
//! `X` and moves first, White plays `O`. Squares are numbered 0..9 in reading
//! order and printed as `a1`..`c3` (file letter, then row from the top).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::position::{Color, Position};

/// Number of squares on the board.
pub const SQUARES: usize = 9;

/// The eight winning lines.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A square on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    /// Square at `index` (0..9), or `None` when off the board.
    pub fn new(index: usize) -> Option<Square> {
        (index < SQUARES).then_some(Square(index as u8))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True for the four corner squares.
    pub fn is_corner(self) -> bool {
        matches!(self.0, 0 | 2 | 6 | 8)
    }

    /// True for the centre square.
    pub fn is_center(self) -> bool {
        self.0 == 4
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.0 % 3) as char;
        let row = self.0 / 3 + 1;
        write!(f, "{file}{row}")
    }
}

/// Errors from parsing boards and squares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {n} cells, found {0}", n = SQUARES)]
    Length(usize),
    #[error("invalid cell '{0}' (use X, O or .)")]
    Cell(char),
    #[error("impossible piece counts: {x} X and {o} O")]
    Counts { x: usize, o: usize },
    #[error("invalid square '{0}'")]
    Square(String),
}

impl FromStr for Square {
    type Err = BoardError;

    /// Parse `a1`..`c3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().to_ascii_lowercase().into_bytes();
        match bytes.as_slice() {
            [file @ b'a'..=b'c', row @ b'1'..=b'3'] => {
                Ok(Square((row - b'1') * 3 + (file - b'a')))
            }
            _ => Err(BoardError::Square(s.to_string())),
        }
    }
}

/// A noughts and crosses position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Color>; SQUARES],
    side: Color,
    placed: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The empty board, Black to move.
    pub fn new() -> Self {
        Self {
            cells: [None; SQUARES],
            side: Color::Black,
            placed: 0,
        }
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Color> {
        self.cells[sq.index()]
    }

    /// Contents of the square at `index`.
    #[inline]
    pub fn cell(&self, index: usize) -> Option<Color> {
        self.cells[index]
    }

    /// Pieces on the board.
    #[inline]
    pub fn placed(&self) -> usize {
        self.placed as usize
    }

    /// The side with three in a row, if any.
    pub fn winner(&self) -> Option<Color> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line.iter()
                .all(|&i| self.cells[i] == Some(first))
                .then_some(first)
        })
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.placed() == SQUARES
    }

    /// True when the game is over (a line is complete or the board is full).
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Empty squares in index order, or nothing once the game is over.
    pub fn legal_moves(&self) -> Vec<Square> {
        if self.winner().is_some() {
            return Vec::new();
        }
        (0..SQUARES)
            .filter(|&i| self.cells[i].is_none())
            .map(|i| Square(i as u8))
            .collect()
    }

    /// Would `color` complete a line by playing `sq`?
    pub fn completes_line(&self, sq: Square, color: Color) -> bool {
        LINES.iter().filter(|line| line.contains(&sq.index())).any(|line| {
            line.iter()
                .filter(|&&i| i != sq.index())
                .all(|&i| self.cells[i] == Some(color))
        })
    }
}

impl Position for Board {
    type Move = Square;

    fn apply(&mut self, mv: Square) {
        debug_assert!(self.cells[mv.index()].is_none(), "square {mv} is occupied");
        self.cells[mv.index()] = Some(self.side);
        self.side = self.side.opponent();
        self.placed += 1;
    }

    fn side_to_move(&self) -> Color {
        self.side
    }

    fn is_board_empty(&self) -> bool {
        self.placed == 0
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse nine cells in reading order; `/` and whitespace are ignored.
    /// The side to move follows from the piece counts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace() && *c != '/').collect();
        if cells.len() != SQUARES {
            return Err(BoardError::Length(cells.len()));
        }

        let mut board = Board::new();
        for (i, c) in cells.into_iter().enumerate() {
            board.cells[i] = match c {
                'X' | 'x' => Some(Color::Black),
                'O' | 'o' => Some(Color::White),
                '.' | '-' => None,
                other => return Err(BoardError::Cell(other)),
            };
        }

        let x = board.cells.iter().filter(|c| **c == Some(Color::Black)).count();
        let o = board.cells.iter().filter(|c| **c == Some(Color::White)).count();
        board.side = match x.checked_sub(o) {
            Some(0) => Color::Black,
            Some(1) => Color::White,
            _ => return Err(BoardError::Counts { x, o }),
        };
        board.placed = (x + o) as u8;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let line: Vec<&str> = (0..3)
                .map(|col| match self.cells[row * 3 + col] {
                    Some(Color::Black) => "X",
                    Some(Color::White) => "O",
                    None => ".",
                })
                .collect();
            writeln!(f, "{} {}", row + 1, line.join(" "))?;
        }
        write!(f, "  a b c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_square_round_trip_names() {
        assert_eq!(sq("a1").index(), 0);
        assert_eq!(sq("c1").index(), 2);
        assert_eq!(sq("b2").index(), 4);
        assert_eq!(sq("c3").index(), 8);
        assert_eq!(Square::new(5).unwrap().to_string(), "c2");
        assert!("d1".parse::<Square>().is_err());
        assert!(Square::new(9).is_none());
    }

    #[test]
    fn test_apply_alternates_sides() {
        let mut board = Board::new();
        assert!(board.is_board_empty());
        board.apply(sq("b2"));
        assert_eq!(board.get(sq("b2")), Some(Color::Black));
        assert_eq!(board.side_to_move(), Color::White);
        assert!(!board.is_board_empty());
        assert_eq!(board.legal_moves().len(), 8);
    }

    #[test]
    fn test_parse_board() {
        let board: Board = "XO./.X./..O".parse().unwrap();
        assert_eq!(board.placed(), 4);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.get(sq("a1")), Some(Color::Black));
        assert_eq!(board.get(sq("c3")), Some(Color::White));

        assert_eq!("XX.......".parse::<Board>(), Err(BoardError::Counts { x: 2, o: 0 }));
        assert_eq!("X..".parse::<Board>(), Err(BoardError::Length(3)));
        assert_eq!("X...Z....".parse::<Board>(), Err(BoardError::Cell('Z')));
    }

    #[test]
    fn test_winner_and_terminal() {
        let board: Board = "XXX/OO./...".parse().unwrap();
        assert_eq!(board.winner(), Some(Color::Black));
        assert!(board.is_terminal());
        assert!(board.legal_moves().is_empty());

        let draw: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(draw.winner(), None);
        assert!(draw.is_terminal());
        assert!(draw.legal_moves().is_empty());
    }

    #[test]
    fn test_completes_line() {
        let board: Board = "XX./OO./...".parse().unwrap();
        assert!(board.completes_line(sq("c1"), Color::Black));
        assert!(board.completes_line(sq("c2"), Color::White));
        assert!(!board.completes_line(sq("c3"), Color::Black));
    }

    #[test]
    fn test_display() {
        let board: Board = "X../.O./...".parse().unwrap();
        assert_eq!(board.to_string(), "1 X . .\n2 . O .\n3 . . .\n  a b c");
    }
}
