//! Annotation labels and their legacy numeric codes.
//!
//! The on-disk format packs a 6-bit type code drawn from a fixed 51-entry
//! table. Inside the crate every annotation carries a [`Label`] instead; the
//! numeric code only appears at the serialization boundary.

/// Beat morphology classes (codes 1–13, 34, 35, 38, 41).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BeatClass {
    /// Normal beat.
    Normal,
    /// Left bundle branch block beat.
    LeftBundleBranchBlock,
    /// Right bundle branch block beat.
    RightBundleBranchBlock,
    /// Aberrated atrial premature beat.
    Aberrated,
    /// Premature ventricular contraction.
    PrematureVentricular,
    /// Fusion of ventricular and normal beat.
    Fusion,
    /// Nodal premature beat.
    NodalPremature,
    /// Atrial premature contraction.
    AtrialPremature,
    /// Supraventricular premature beat.
    SupraventricularPremature,
    /// Ventricular escape beat.
    VentricularEscape,
    /// Nodal escape beat.
    NodalEscape,
    /// Paced beat.
    Paced,
    /// Unclassifiable beat.
    Unknown,
    /// Atrial escape beat.
    AtrialEscape,
    /// Supraventricular escape beat.
    SupraventricularEscape,
    /// Fusion of paced and normal beat.
    PacedFusion,
    /// R-on-T premature ventricular contraction.
    ROnT,
}

/// Which wave a boundary or peak belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveKind {
    /// Atrial depolarization.
    P,
    /// Ventricular repolarization.
    T,
}

/// Position inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePoint {
    /// Wave start.
    Onset,
    /// Wave apex.
    Peak,
    /// Wave end.
    Offset,
}

/// Sub-peak inside a QRS complex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubPeakKind {
    /// Negative deflection before R.
    Q,
    /// Positive deflection.
    R,
    /// Negative deflection after R.
    S,
}

/// Remaining non-beat codes with no role in the detection pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Code 0.
    NotQrs,
    /// ST segment change.
    StChange,
    /// T-wave change.
    TChange,
    /// Systole.
    Systole,
    /// Diastole.
    Diastole,
    /// Free-text note.
    Note,
    /// Measurement.
    Measure,
    /// Bundle branch block beat (unspecified).
    BundleBranchBlock,
    /// Non-conducted pacer spike.
    PaceSpike,
    /// Rhythm change.
    RhythmChange,
    /// U-wave peak.
    UWave,
    /// Learning.
    Learn,
    /// Ventricular flutter wave.
    FlutterWave,
    /// Start of ventricular flutter or fibrillation.
    FibrillationOn,
    /// End of ventricular flutter or fibrillation.
    FibrillationOff,
    /// Link to external data.
    Link,
    /// Non-conducted P wave.
    NonConductedP,
}

/// Semantic label of one annotation record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// Beat start, classified.
    Beat(BeatClass),
    /// Explicit QRS onset, `(`.
    QrsOnset,
    /// QRS end (J point), `)`.
    QrsEnd,
    /// P or T wave boundary or peak.
    Wave {
        /// P or T.
        wave: WaveKind,
        /// Onset, peak or offset.
        point: WavePoint,
    },
    /// q/r/s sub-peak; `large` selects the upper-case form.
    SubPeak {
        /// Q, R or S.
        peak: SubPeakKind,
        /// Amplitude above the large-peak threshold.
        large: bool,
    },
    /// Beat flagged by the RR-interval rules.
    Ectopic,
    /// QRS window without usable R or S peak.
    Artifact,
    /// Unanalyzable signal region.
    Noise,
    /// Any other table entry.
    Marker(MarkerKind),
}

/// How a label takes part in RR-interval extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RrRole {
    /// Ignored.
    Skip,
    /// Breaks the interval chain.
    Reset,
    /// Fiducial beat.
    Beat,
}

const MNEMONICS: [&str; 51] = [
    "notQRS", "N", "LBBB", "RBBB", "ABERR", "PVC", "FUSION", "NPC", "APC", "SVPB", "VESC", "NESC",
    "PACE", "UNKNOWN", "NOISE", "q", "ARFCT", "Q", "STCH", "TCH", "SYSTOLE", "DIASTOLE", "NOTE",
    "MEASURE", "P", "BBB", "PACESP", "T", "RTM", "U", "LEARN", "FLWAV", "VFON", "VFOFF", "AESC",
    "SVESC", "LINK", "NAPC", "PFUSE", "(", ")", "RONT", "(p", "p)", "(t", "t)", "ECT", "r", "R",
    "s", "S",
];

impl Label {
    /// Normal beat, the label of every detected QRS onset.
    pub const NORMAL: Label = Label::Beat(BeatClass::Normal);

    /// Number of entries in the legacy code table.
    pub const TABLE_SIZE: usize = MNEMONICS.len();

    /// Legacy numeric code.
    pub fn code(&self) -> u8 {
        use BeatClass as B;
        use MarkerKind as M;
        match *self {
            Self::Beat(class) => match class {
                B::Normal => 1,
                B::LeftBundleBranchBlock => 2,
                B::RightBundleBranchBlock => 3,
                B::Aberrated => 4,
                B::PrematureVentricular => 5,
                B::Fusion => 6,
                B::NodalPremature => 7,
                B::AtrialPremature => 8,
                B::SupraventricularPremature => 9,
                B::VentricularEscape => 10,
                B::NodalEscape => 11,
                B::Paced => 12,
                B::Unknown => 13,
                B::AtrialEscape => 34,
                B::SupraventricularEscape => 35,
                B::PacedFusion => 38,
                B::ROnT => 41,
            },
            Self::Noise => 14,
            Self::Artifact => 16,
            Self::QrsOnset => 39,
            Self::QrsEnd => 40,
            Self::Ectopic => 46,
            Self::Wave { wave, point } => match (wave, point) {
                (WaveKind::P, WavePoint::Onset) => 42,
                (WaveKind::P, WavePoint::Peak) => 24,
                (WaveKind::P, WavePoint::Offset) => 43,
                (WaveKind::T, WavePoint::Onset) => 44,
                (WaveKind::T, WavePoint::Peak) => 27,
                (WaveKind::T, WavePoint::Offset) => 45,
            },
            Self::SubPeak { peak, large } => match (peak, large) {
                (SubPeakKind::Q, false) => 15,
                (SubPeakKind::Q, true) => 17,
                (SubPeakKind::R, false) => 47,
                (SubPeakKind::R, true) => 48,
                (SubPeakKind::S, false) => 49,
                (SubPeakKind::S, true) => 50,
            },
            Self::Marker(kind) => match kind {
                M::NotQrs => 0,
                M::StChange => 18,
                M::TChange => 19,
                M::Systole => 20,
                M::Diastole => 21,
                M::Note => 22,
                M::Measure => 23,
                M::BundleBranchBlock => 25,
                M::PaceSpike => 26,
                M::RhythmChange => 28,
                M::UWave => 29,
                M::Learn => 30,
                M::FlutterWave => 31,
                M::FibrillationOn => 32,
                M::FibrillationOff => 33,
                M::Link => 36,
                M::NonConductedP => 37,
            },
        }
    }

    /// Label for a legacy numeric code, or `None` outside the table.
    pub fn from_code(code: u8) -> Option<Self> {
        use BeatClass as B;
        use MarkerKind as M;
        let beat = |class| Some(Self::Beat(class));
        let wave = |wave, point| Some(Self::Wave { wave, point });
        let sub = |peak, large| Some(Self::SubPeak { peak, large });
        let marker = |kind| Some(Self::Marker(kind));
        match code {
            0 => marker(M::NotQrs),
            1 => beat(B::Normal),
            2 => beat(B::LeftBundleBranchBlock),
            3 => beat(B::RightBundleBranchBlock),
            4 => beat(B::Aberrated),
            5 => beat(B::PrematureVentricular),
            6 => beat(B::Fusion),
            7 => beat(B::NodalPremature),
            8 => beat(B::AtrialPremature),
            9 => beat(B::SupraventricularPremature),
            10 => beat(B::VentricularEscape),
            11 => beat(B::NodalEscape),
            12 => beat(B::Paced),
            13 => beat(B::Unknown),
            14 => Some(Self::Noise),
            15 => sub(SubPeakKind::Q, false),
            16 => Some(Self::Artifact),
            17 => sub(SubPeakKind::Q, true),
            18 => marker(M::StChange),
            19 => marker(M::TChange),
            20 => marker(M::Systole),
            21 => marker(M::Diastole),
            22 => marker(M::Note),
            23 => marker(M::Measure),
            24 => wave(WaveKind::P, WavePoint::Peak),
            25 => marker(M::BundleBranchBlock),
            26 => marker(M::PaceSpike),
            27 => wave(WaveKind::T, WavePoint::Peak),
            28 => marker(M::RhythmChange),
            29 => marker(M::UWave),
            30 => marker(M::Learn),
            31 => marker(M::FlutterWave),
            32 => marker(M::FibrillationOn),
            33 => marker(M::FibrillationOff),
            34 => beat(B::AtrialEscape),
            35 => beat(B::SupraventricularEscape),
            36 => marker(M::Link),
            37 => marker(M::NonConductedP),
            38 => beat(B::PacedFusion),
            39 => Some(Self::QrsOnset),
            40 => Some(Self::QrsEnd),
            41 => beat(B::ROnT),
            42 => wave(WaveKind::P, WavePoint::Onset),
            43 => wave(WaveKind::P, WavePoint::Offset),
            44 => wave(WaveKind::T, WavePoint::Onset),
            45 => wave(WaveKind::T, WavePoint::Offset),
            46 => Some(Self::Ectopic),
            47 => sub(SubPeakKind::R, false),
            48 => sub(SubPeakKind::R, true),
            49 => sub(SubPeakKind::S, false),
            50 => sub(SubPeakKind::S, true),
            _ => None,
        }
    }

    /// Short listing name (`"N"`, `")"`, `"(p"`, …).
    pub fn mnemonic(&self) -> &'static str {
        MNEMONICS[self.code() as usize]
    }

    /// Whether this label starts a beat in the QRS list.
    pub fn is_beat_start(&self) -> bool {
        matches!(self, Self::Beat(_) | Self::Ectopic | Self::Artifact)
    }

    pub(crate) fn rr_role(&self) -> RrRole {
        match self {
            Self::Noise | Self::Artifact | Self::Ectopic => RrRole::Reset,
            Self::Beat(_) | Self::QrsOnset => RrRole::Beat,
            _ => RrRole::Skip,
        }
    }

    pub(crate) fn is_sub_peak(&self, kind: SubPeakKind) -> bool {
        matches!(self, Self::SubPeak { peak, .. } if *peak == kind)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
