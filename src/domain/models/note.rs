#[cfg(test)]
#[path = "note_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoteSource {
    Backend,
    Fallback,
}

/// The clinical note presented for review once an encounter ends. Always
/// fully assembled before it reaches the review surface; the user is never
/// left without one.
#[derive(Clone, Debug)]
pub struct ClinicalNote {
    pub text: String,
    pub chief_complaint: Option<String>,
    pub generated_at: DateTime<Local>,
    pub source: NoteSource,
}

impl ClinicalNote {
    pub fn from_backend(text: String, chief_complaint: Option<String>) -> ClinicalNote {
        return ClinicalNote {
            text,
            chief_complaint,
            generated_at: Local::now(),
            source: NoteSource::Backend,
        };
    }

    /// Deterministic local chart template, mirroring the section layout the
    /// service itself falls back to: chief complaint (or placeholder),
    /// empty clinical sections, and a generation timestamp.
    pub fn fallback(chief_complaint: Option<&str>) -> ClinicalNote {
        let generated_at = Local::now();
        let cc = match chief_complaint {
            Some(cc) if !cc.trim().is_empty() => cc.trim().to_string(),
            _ => "（未入力）".to_string(),
        };

        let text = format!(
            "# 内科カルテ\n\n\
             **主訴**: {cc}\n\n\
             **現病歴**: （チャット内容をもとに要約）\n\n\
             **既往歴**: \n\n\
             **アレルギー**: \n\n\
             **内服薬**: \n\n\
             **身体所見**: \n\n\
             **鑑別診断**: \n\n\
             **評価**: \n\n\
             **Plan**: 検査/処方/指導/フォローアップ\n\n\
             ---\n作成時刻: {}",
            generated_at.format("%Y-%m-%d %H:%M"),
        );

        return ClinicalNote {
            text,
            chief_complaint: chief_complaint.map(|cc| return cc.to_string()),
            generated_at,
            source: NoteSource::Fallback,
        };
    }
}
