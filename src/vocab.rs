//! Closed vocabularies mapping upstream smart-group tags to report labels.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Faculty {
    ArtsHumanities,
    EnvironmentalLifeSciences,
    EngineeringPhysicalSciences,
    Medicine,
    SocialSciences,
    ProfessionalServices,
}

impl Faculty {
    /// Declaration order is report order.
    pub const ALL: [Faculty; 6] = [
        Faculty::ArtsHumanities,
        Faculty::EnvironmentalLifeSciences,
        Faculty::EngineeringPhysicalSciences,
        Faculty::Medicine,
        Faculty::SocialSciences,
        Faculty::ProfessionalServices,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Faculty::ArtsHumanities => "fah-faculty-of-arts-humanities",
            Faculty::EnvironmentalLifeSciences => "fels-faculty-of-environmental-life-sciences",
            Faculty::EngineeringPhysicalSciences => "feps-faculty-of-engineering-physical-sciences",
            Faculty::Medicine => "fm-faculty-of-medicine",
            Faculty::SocialSciences => "fss-faculty-of-social-sciences",
            Faculty::ProfessionalServices => "professional-services",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Faculty::ArtsHumanities => "FAH (Faculty of Arts & Humanities)",
            Faculty::EnvironmentalLifeSciences => "FELS (Faculty of Environmental & Life Sciences)",
            Faculty::EngineeringPhysicalSciences => {
                "FEPS (Faculty of Engineering & Physical Sciences)"
            }
            Faculty::Medicine => "FM (Faculty of Medicine)",
            Faculty::SocialSciences => "FSS (Faculty of Social Sciences)",
            Faculty::ProfessionalServices => "Professional Services",
        }
    }

    /// Short column heading used in the membership breakdown.
    pub fn code(self) -> &'static str {
        match self {
            Faculty::ArtsHumanities => "FAH",
            Faculty::EnvironmentalLifeSciences => "FELS",
            Faculty::EngineeringPhysicalSciences => "FEPS",
            Faculty::Medicine => "FM",
            Faculty::SocialSciences => "FSS",
            Faculty::ProfessionalServices => "PS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hub {
    AiSociety,
    HealthWellbeing,
    NatureBiodiversity,
    FutureCities,
}

impl Hub {
    pub const ALL: [Hub; 4] = [
        Hub::AiSociety,
        Hub::HealthWellbeing,
        Hub::NatureBiodiversity,
        Hub::FutureCities,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Hub::AiSociety => "artificial-intelligence-ai-society",
            Hub::HealthWellbeing => "health-wellbeing",
            Hub::NatureBiodiversity => "nature-biodiversity-sustainability",
            Hub::FutureCities => "future-cities",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hub::AiSociety => "Artificial Intelligence (AI) & Society",
            Hub::HealthWellbeing => "Health & Wellbeing",
            Hub::NatureBiodiversity => "Nature, Biodiversity & Sustainability",
            Hub::FutureCities => "Future Cities",
        }
    }
}

/// Smart group for contacts who currently work or study at the UoS.
pub const CURRENT_UOS_TAG: &str = "work-study-at-the-uos";
pub const ALUMNI_TAG: &str = "alumni-of-the-uos";

// Custom-property fallbacks for contacts without smart groups.
pub const CURRENT_UOS_PROPERTY: &str = "Do you currently work or study at the UoS?";
pub const ALUMNI_PROPERTY: &str = "Alumni";
