//! Wire format for score submissions
//!
//! One flat JSON object per finished run, field names as the score service
//! expects them.

use serde::{Deserialize, Serialize};

use crate::core::RunReport;
use crate::types::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub points: u32,
    pub level: u32,
    pub rows_deleted: u32,
    pub i_pieces: u32,
    pub o_pieces: u32,
    pub t_pieces: u32,
    pub s_pieces: u32,
    pub z_pieces: u32,
    pub j_pieces: u32,
    pub l_pieces: u32,
}

impl From<&RunReport> for SubmissionPayload {
    fn from(report: &RunReport) -> Self {
        Self {
            points: report.score,
            level: report.level,
            rows_deleted: report.rows_cleared,
            i_pieces: report.piece_count(PieceKind::I),
            o_pieces: report.piece_count(PieceKind::O),
            t_pieces: report.piece_count(PieceKind::T),
            s_pieces: report.piece_count(PieceKind::S),
            z_pieces: report.piece_count(PieceKind::Z),
            j_pieces: report.piece_count(PieceKind::J),
            l_pieces: report.piece_count(PieceKind::L),
        }
    }
}

impl SubmissionPayload {
    /// Count for one kind
    pub fn pieces(&self, kind: PieceKind) -> u32 {
        match kind {
            PieceKind::I => self.i_pieces,
            PieceKind::J => self.j_pieces,
            PieceKind::L => self.l_pieces,
            PieceKind::O => self.o_pieces,
            PieceKind::S => self.s_pieces,
            PieceKind::T => self.t_pieces,
            PieceKind::Z => self.z_pieces,
        }
    }

    /// Total pieces spawned during the run
    pub fn total_pieces(&self) -> u32 {
        PieceKind::ALL.iter().map(|&kind| self.pieces(kind)).sum()
    }

    /// Serialize to one newline-terminated JSON line
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            run_id: 3,
            score: 41,
            level: 4,
            rows_cleared: 7,
            // I J L O S T Z
            piece_counts: [1, 2, 3, 4, 5, 6, 7],
        }
    }

    #[test]
    fn test_payload_maps_counts_by_kind() {
        let payload = SubmissionPayload::from(&report());
        assert_eq!(payload.points, 41);
        assert_eq!(payload.rows_deleted, 7);
        assert_eq!(payload.i_pieces, 1);
        assert_eq!(payload.j_pieces, 2);
        assert_eq!(payload.l_pieces, 3);
        assert_eq!(payload.o_pieces, 4);
        assert_eq!(payload.s_pieces, 5);
        assert_eq!(payload.t_pieces, 6);
        assert_eq!(payload.z_pieces, 7);
        assert_eq!(payload.total_pieces(), 28);
    }

    #[test]
    fn test_payload_field_names() {
        let payload = SubmissionPayload::from(&report());
        let value: serde_json::Value = serde_json::to_value(payload).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "points",
            "level",
            "rows_deleted",
            "i_pieces",
            "o_pieces",
            "t_pieces",
            "s_pieces",
            "z_pieces",
            "j_pieces",
            "l_pieces",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["level"], 4);
    }

    #[test]
    fn test_json_line_is_newline_terminated() {
        let line = SubmissionPayload::from(&report()).to_json_line().unwrap();
        assert_eq!(line.last(), Some(&b'\n'));
        assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
    }
}
