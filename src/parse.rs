use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use crate::{Cell, Grid};

impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        let mut width = None;
        for (i, line) in s.lines().map(|line| line.trim()).enumerate() {
            if line.is_empty() {
                continue;
            }
            let expected = *width.get_or_insert(line.chars().count());
            ensure!(
                line.chars().count() == expected,
                "Width mismatch on line {i}, expecting width {expected}",
            );
            let row = line
                .chars()
                .map(|ch| -> Result<Cell> {
                    Ok(match ch {
                        '#' => Cell::Wall,
                        '.' => Cell::Path,
                        'S' => Cell::Start,
                        'E' => Cell::End,
                        _ => bail!("Invalid cell: {ch:?}"),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        Ok(Grid::new(rows)?)
    }
}

/// Shape of the maze API payload: a list of mazes, or a bare maze.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Many(Vec<Vec<Vec<Cell>>>),
    One(Vec<Vec<Cell>>),
}

/// Parse every maze in `s`, either JSON tags or text blocks separated by blank lines.
pub fn parse_mazes(s: &str) -> Result<Vec<Grid>> {
    let s = s.trim();
    let mazes = if s.starts_with('[') {
        parse_json(s)?
    } else {
        parse_text(s)?
    };
    ensure!(!mazes.is_empty(), "No maze found");
    Ok(mazes)
}

fn parse_json(s: &str) -> Result<Vec<Grid>> {
    let payload = serde_json::from_str::<Payload>(s).context("Invalid maze JSON")?;
    let raw = match payload {
        Payload::Many(mazes) => mazes,
        Payload::One(maze) => vec![maze],
    };
    raw.into_iter()
        .enumerate()
        .map(|(i, rows)| Grid::new(rows).with_context(|| format!("Invalid maze #{i}")))
        .collect()
}

fn parse_text(s: &str) -> Result<Vec<Grid>> {
    let mut lines = s.lines().map(|line| line.trim());
    let mut mazes = Vec::new();
    while let Some(first) = lines.next() {
        if first.is_empty() {
            continue;
        }
        let mut block = first.to_owned();
        while let Some(line) = lines.next().filter(|line| !line.is_empty()) {
            block.push('\n');
            block.push_str(line);
        }
        let grid = block
            .parse::<Grid>()
            .with_context(|| format!("Invalid maze #{}", mazes.len()))?;
        mazes.push(grid);
    }
    Ok(mazes)
}
