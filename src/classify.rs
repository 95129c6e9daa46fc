//! Risk Classification
//!
//! Half-open bands over the crisp score:
//! - score < 45        → SeverelyStunted
//! - 45 <= score < 75  → Stunted
//! - score >= 75       → Normal
//!
//! A boundary value belongs to the band above it.

use crate::error::{Result, ScreeningError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SeverelyStunted,
    Stunted,
    Normal,
}

impl Category {
    /// Stable machine key
    pub fn key(&self) -> &'static str {
        match self {
            Category::SeverelyStunted => "severely_stunted",
            Category::Stunted => "stunted",
            Category::Normal => "normal",
        }
    }

    /// Status line shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Category::SeverelyStunted => "Severely Stunted (Stunting Berat)",
            Category::Stunted => "Stunted (Stunting)",
            Category::Normal => "Normal",
        }
    }

    /// Styling hint for presentation layers
    pub fn tone(&self) -> &'static str {
        match self {
            Category::SeverelyStunted => "danger",
            Category::Stunted => "warning",
            Category::Normal => "success",
        }
    }

    /// Fixed, ordered recommendations for this category
    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            Category::SeverelyStunted => SEVERELY_STUNTED_ADVICE,
            Category::Stunted => STUNTED_ADVICE,
            Category::Normal => NORMAL_ADVICE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Advice tables
// ============================================================================

const SEVERELY_STUNTED_ADVICE: &[&str] = &[
    "SEGERA rujuk ke Rumah Sakit atau Dokter Spesialis Anak.",
    "Pemberian Pangan Olahan untuk Keperluan Medis Khusus (PKMK) di bawah pengawasan dokter.",
    "Investigasi penyakit penyerta (seperti TBC, infeksi berulang) yang menghambat pertumbuhan.",
    "Pemantauan pertumbuhan secara intensif setiap minggu.",
];

const STUNTED_ADVICE: &[&str] = &[
    "Evaluasi pola makan: Wajib tambahkan satu porsi protein hewani (telur, ikan, ayam, daging) setiap kali makan.",
    "Berikan Pemberian Makanan Tambahan (PMT) tinggi kalori dan protein.",
    "Suplementasi mikronutrien (Taburia, Zinc, Vitamin A) sesuai anjuran Puskesmas/Posyandu.",
    "Cek sanitasi lingkungan (air bersih dan jamban) serta perilaku hidup bersih.",
];

const NORMAL_ADVICE: &[&str] = &[
    "Pertahankan pola makan gizi seimbang (Isi Piringku).",
    "Lanjutkan pemantauan pertumbuhan rutin di Posyandu setiap bulan.",
    "Pastikan imunisasi dasar dan lanjutan lengkap.",
    "Jaga kebersihan diri dan lingkungan untuk mencegah infeksi.",
];

// ============================================================================
// Classifier
// ============================================================================

/// Lower bounds of the Stunted and Normal bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub stunted_from: f64,
    pub normal_from: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stunted_from: 45.0,
            normal_from: 75.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        let ok = self.stunted_from.is_finite()
            && self.normal_from.is_finite()
            && self.stunted_from >= 0.0
            && self.stunted_from < self.normal_from;
        if !ok {
            return Err(ScreeningError::Config(format!(
                "thresholds must satisfy 0 <= stunted_from < normal_from, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn category(&self, score: f64) -> Category {
        if score < self.thresholds.stunted_from {
            Category::SeverelyStunted
        } else if score < self.thresholds.normal_from {
            Category::Stunted
        } else {
            Category::Normal
        }
    }

    pub fn classify(&self, score: f64) -> Classification {
        let category = self.category(score);
        Classification {
            category,
            advice: category.advice().iter().map(|s| s.to_string()).collect(),
        }
    }
}
