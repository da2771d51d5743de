//! Plain-text maps.
//!
//! ```text
//! # comment
//! size 6 4
//! [walls]
//! 2 2 2 2 2 2
//! 2 0 0 0 0 2
//! 2 0 0 0 0 2
//! 2 2 2 2 2 2
//! [floor]
//! ...
//! [ceiling]
//! ...
//! [objects]
//! player 1 1
//! red_ogre 3 2
//! ```
//!
//! `size` must come before any layer.  A missing layer stays all-empty.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{MapError, MapFile, MapObject};

static SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^size\s+(\d+)\s+(\d+)$").unwrap());
static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(walls|floor|ceiling|objects)\]$").unwrap());
static OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s+(\d+)\s+(\d+)$").unwrap());

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Walls,
    Floor,
    Ceiling,
    Objects,
}

fn parse_err(line: usize, msg: impl Into<String>) -> MapError {
    MapError::Parse {
        line,
        msg: msg.into(),
    }
}

impl MapFile {
    /// Parse the text format.  Errors carry the 1-based line number.
    pub fn from_text(src: &str) -> Result<Self, MapError> {
        let mut map: Option<MapFile> = None;
        let mut section: Option<Section> = None;
        let mut row = 0usize;

        for (i, raw) in src.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(c) = SIZE.captures(line) {
                if map.is_some() {
                    return Err(parse_err(line_no, "size given twice"));
                }
                let w: u32 = c[1].parse().map_err(|_| parse_err(line_no, "bad width"))?;
                let h: u32 = c[2].parse().map_err(|_| parse_err(line_no, "bad height"))?;
                let n = w as usize * h as usize;
                map = Some(MapFile {
                    width: w,
                    height: h,
                    floor: vec![0; n],
                    walls: vec![0; n],
                    ceiling: vec![0; n],
                    objects: Vec::new(),
                });
                continue;
            }

            if let Some(c) = SECTION.captures(line) {
                section = Some(match &c[1] {
                    "walls" => Section::Walls,
                    "floor" => Section::Floor,
                    "ceiling" => Section::Ceiling,
                    _ => Section::Objects,
                });
                row = 0;
                continue;
            }

            let Some(m) = map.as_mut() else {
                return Err(parse_err(line_no, "`size W H` must come first"));
            };
            let Some(sec) = section else {
                return Err(parse_err(line_no, format!("unexpected `{line}` outside a section")));
            };

            if sec == Section::Objects {
                let c = OBJECT
                    .captures(line)
                    .ok_or_else(|| parse_err(line_no, format!("bad object `{line}`")))?;
                let x: u32 = c[2].parse().map_err(|_| parse_err(line_no, "bad x"))?;
                let y: u32 = c[3].parse().map_err(|_| parse_err(line_no, "bad y"))?;
                if x >= m.width || y >= m.height {
                    return Err(parse_err(line_no, format!("object at ({x}, {y}) is off the map")));
                }
                m.objects.push(MapObject::new(&c[1], x, y));
                continue;
            }

            if row >= m.height as usize {
                return Err(parse_err(line_no, "too many rows"));
            }
            let ids = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<u8>()
                        .map_err(|_| parse_err(line_no, format!("bad tile id `{tok}`")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if ids.len() != m.width as usize {
                return Err(parse_err(
                    line_no,
                    format!("row has {} tiles, expected {}", ids.len(), m.width),
                ));
            }
            let layer = match sec {
                Section::Walls => &mut m.walls,
                Section::Floor => &mut m.floor,
                Section::Ceiling => &mut m.ceiling,
                Section::Objects => unreachable!(),
            };
            let start = row * m.width as usize;
            layer[start..start + ids.len()].copy_from_slice(&ids);
            row += 1;
        }

        map.ok_or_else(|| parse_err(0, "no `size` line"))
    }
}
