use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use thiserror::Error;
use volley_entities::{prelude::{Gender, Participant, ParticipantScore}, Uuid};


#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not parse csv: {0}")]
    ParseError(#[from] csv::Error),
    #[error("Could not read file: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: Uuid,
    username: String,
    gender: Gender,
}

#[derive(Debug, Deserialize)]
struct ScoredPlayerRow {
    id: Uuid,
    username: String,
    gender: Gender,
    score: f64,
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Reads `id,username,gender` rows.
pub fn read_users<R: Read>(reader: R) -> Result<Vec<Participant>, ImportError> {
    let mut reader = reader_for(reader);
    let mut users = vec![];
    for row in reader.deserialize::<UserRow>() {
        let row = row?;
        users.push(Participant::new(row.id, row.username, row.gender));
    }
    Ok(users)
}

pub fn read_users_from_path(path: impl AsRef<Path>) -> Result<Vec<Participant>, ImportError> {
    read_users(File::open(path)?)
}

/// Reads `id,username,gender,score` rows, for balancing outside of an event.
pub fn read_scored_players<R: Read>(reader: R) -> Result<Vec<ParticipantScore>, ImportError> {
    let mut reader = reader_for(reader);
    let mut players = vec![];
    for row in reader.deserialize::<ScoredPlayerRow>() {
        let row = row?;
        players.push(ParticipantScore {
            user_id: row.id,
            username: row.username,
            gender: row.gender,
            average_score: row.score,
        });
    }
    Ok(players)
}

pub fn read_scored_players_from_path(path: impl AsRef<Path>) -> Result<Vec<ParticipantScore>, ImportError> {
    read_scored_players(File::open(path)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_users() {
        let data = "id,username,gender\n\
            00000000-0000-0000-0000-000000000001, alpha, M\n\
            00000000-0000-0000-0000-000000000002,bravo,F\n";
        let users = read_users(data.as_bytes()).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, Uuid::from_u128(1));
        assert_eq!(users[0].username, "alpha");
        assert_eq!(users[1].gender, Gender::F);
    }

    #[test]
    fn test_read_users_rejects_unknown_gender() {
        let data = "id,username,gender\n00000000-0000-0000-0000-000000000001,alpha,X\n";
        assert!(matches!(read_users(data.as_bytes()), Err(ImportError::ParseError(_))));
    }

    #[test]
    fn test_read_scored_players() {
        let data = "id,username,gender,score\n00000000-0000-0000-0000-000000000003,charlie,M,7.5\n";
        let players = read_scored_players(data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].average_score, 7.5);
    }
}
