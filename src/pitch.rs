use crate::transpose::Direction;
use serde::Serialize;
use std::fmt;

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    const BY_STEP: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    /// Letter from either case ("e" and "E" are both E)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    /// Semitone offset of the natural letter from C
    fn semitone(self) -> i8 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Position in the letter cycle C D E F G A B
    fn step(self) -> usize {
        match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        }
    }

    fn neighbour(self, direction: Direction) -> Self {
        let step = match direction {
            Direction::Up => (self.step() + 1) % 7,
            Direction::Down => (self.step() + 6) % 7,
        };
        Self::BY_STEP[step]
    }
}

/// A spelled pitch class: letter plus alteration (+1 per sharp, -1 per flat).
///
/// Spelling matters here: `C#` and `Db` are different `Pitch` values with the
/// same [`chroma`](Pitch::chroma).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: NoteName,
    pub alteration: i8,
}

/// Longest accidental run accepted on a pitch name
const MAX_ACCIDENTALS: usize = 4;

impl Pitch {
    pub fn new(name: NoteName, alteration: i8) -> Self {
        Self { name, alteration }
    }

    /// Parse a string that is exactly one pitch name ("C", "f#", "Bb").
    pub fn parse(s: &str) -> Option<Self> {
        match Self::parse_prefix(s) {
            Some((pitch, consumed)) if consumed == s.len() => Some(pitch),
            _ => None,
        }
    }

    /// Parse a pitch name at the start of `s`.
    ///
    /// Returns the pitch and the number of bytes it occupies. Accidentals are a
    /// run of `#` or a run of `b`, never mixed.
    pub(crate) fn parse_prefix(s: &str) -> Option<(Self, usize)> {
        let name = NoteName::from_char(s.chars().next()?)?;
        let rest = &s[1..];

        let (alteration, run) = match rest.chars().next() {
            Some('#') => {
                let run = rest.chars().take_while(|&c| c == '#').count();
                (run as i8, run)
            }
            Some('b') => {
                let run = rest.chars().take_while(|&c| c == 'b').count();
                (-(run as i8), run)
            }
            _ => (0, 0),
        };
        if run > MAX_ACCIDENTALS {
            return None;
        }

        Some((Self { name, alteration }, 1 + run))
    }

    /// Pitch class 0-11 (C = 0)
    pub fn chroma(&self) -> u8 {
        (self.name.semitone() + self.alteration).rem_euclid(12) as u8
    }

    /// Fewest accidentals, keeping the direction of the written accidental:
    /// `E#` -> `F`, `Cb` -> `B`, `C##` -> `D`, `Db` stays `Db`.
    pub fn simplify(&self) -> Self {
        Self::from_chroma(self.chroma(), self.alteration > 0)
    }

    /// The other common spelling of the same pitch: `C#` <-> `Db`.
    /// Naturals map onto themselves; `B#` becomes `C`.
    pub fn enharmonic(&self) -> Self {
        Self::from_chroma(self.chroma(), self.alteration < 0)
    }

    /// Move one minor second by letter: up to the next letter, down to the
    /// previous one, adjusting the alteration to land a semitone away.
    /// `C` up is `Db`, `C#` down is `B#`; callers respell the result.
    pub fn minor_second(&self, direction: Direction) -> Self {
        let target = match direction {
            Direction::Up => self.chroma() as i8 + 1,
            Direction::Down => self.chroma() as i8 - 1,
        };
        let name = self.name.neighbour(direction);
        let alteration = (target - name.semitone() + 6).rem_euclid(12) - 6;
        Self { name, alteration }
    }

    /// Spell a pitch class with at most one accidental.
    fn from_chroma(chroma: u8, sharps: bool) -> Self {
        let (name, alteration) = match chroma % 12 {
            0 => (NoteName::C, 0),
            1 => if sharps { (NoteName::C, 1) } else { (NoteName::D, -1) },
            2 => (NoteName::D, 0),
            3 => if sharps { (NoteName::D, 1) } else { (NoteName::E, -1) },
            4 => (NoteName::E, 0),
            5 => (NoteName::F, 0),
            6 => if sharps { (NoteName::F, 1) } else { (NoteName::G, -1) },
            7 => (NoteName::G, 0),
            8 => if sharps { (NoteName::G, 1) } else { (NoteName::A, -1) },
            9 => (NoteName::A, 0),
            10 => if sharps { (NoteName::A, 1) } else { (NoteName::B, -1) },
            11 => (NoteName::B, 0),
            _ => unreachable!(),
        };
        Self { name, alteration }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_char())?;
        let accidental = if self.alteration > 0 { "#" } else { "b" };
        for _ in 0..self.alteration.unsigned_abs() {
            f.write_str(accidental)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(s: &str) -> Pitch {
        Pitch::parse(s).unwrap()
    }

    #[test]
    fn test_parse_pitch_names() {
        assert_eq!(pitch("C"), Pitch::new(NoteName::C, 0));
        assert_eq!(pitch("f#"), Pitch::new(NoteName::F, 1));
        assert_eq!(pitch("Bbb"), Pitch::new(NoteName::B, -2));
        assert!(Pitch::parse("H").is_none());
        assert!(Pitch::parse("C#b").is_none());
        assert!(Pitch::parse("").is_none());
    }

    #[test]
    fn test_parse_prefix_reports_consumed_bytes() {
        assert_eq!(Pitch::parse_prefix("Ebm7"), Some((Pitch::new(NoteName::E, -1), 2)));
        assert_eq!(Pitch::parse_prefix("Am"), Some((Pitch::new(NoteName::A, 0), 1)));
        assert_eq!(Pitch::parse_prefix("xyz"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(pitch("c#").to_string(), "C#");
        assert_eq!(pitch("Abb").to_string(), "Abb");
        assert_eq!(pitch("G").to_string(), "G");
    }

    #[test]
    fn test_simplify() {
        assert_eq!(pitch("E#").simplify().to_string(), "F");
        assert_eq!(pitch("Cb").simplify().to_string(), "B");
        assert_eq!(pitch("C##").simplify().to_string(), "D");
        assert_eq!(pitch("C#").simplify().to_string(), "C#");
        assert_eq!(pitch("Db").simplify().to_string(), "Db");
    }

    #[test]
    fn test_enharmonic() {
        assert_eq!(pitch("C#").enharmonic().to_string(), "Db");
        assert_eq!(pitch("Db").enharmonic().to_string(), "C#");
        assert_eq!(pitch("A").enharmonic().to_string(), "A");
        assert_eq!(pitch("B#").enharmonic().to_string(), "C");
        assert_eq!(pitch("Fb").enharmonic().to_string(), "E");
    }

    #[test]
    fn test_minor_second_keeps_letter_order() {
        assert_eq!(pitch("C").minor_second(Direction::Up).to_string(), "Db");
        assert_eq!(pitch("E").minor_second(Direction::Up).to_string(), "F");
        assert_eq!(pitch("B").minor_second(Direction::Up).to_string(), "C");
        assert_eq!(pitch("C").minor_second(Direction::Down).to_string(), "B");
        assert_eq!(pitch("C#").minor_second(Direction::Down).to_string(), "B#");
        assert_eq!(pitch("D").minor_second(Direction::Down).to_string(), "C#");
    }
}
