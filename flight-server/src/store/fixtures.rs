//! Sample network shared by planner and web tests.
//!
//! Nine airports across East Asia and the Americas. There is no direct
//! BKK-MEX route, so that leg always needs a connection.

use crate::domain::VisaRequirement;

use super::MemoryStore;

/// Build the sample network.
pub(crate) fn sample_network() -> MemoryStore {
    MemoryStore::builder()
        .named_airport("HKG", "Hong Kong International", "HKG", 22.31, 113.91)
        .named_airport("NRT", "Narita International", "JPN", 35.76, 140.39)
        .named_airport("TPE", "Taoyuan International", "TWN", 25.08, 121.23)
        .named_airport("BKK", "Suvarnabhumi", "THA", 13.69, 100.75)
        .named_airport("MEX", "Benito Juarez International", "MEX", 19.44, -99.07)
        .named_airport("LAX", "Los Angeles International", "USA", 33.94, -118.41)
        .named_airport("YVR", "Vancouver International", "CAN", 49.19, -123.18)
        .named_airport("ICN", "Incheon International", "KOR", 37.46, 126.44)
        .named_airport("EZE", "Ministro Pistarini", "ARG", -34.82, -58.54)
        .route("HKG", "NRT", 2950, 270)
        .route("HKG", "TPE", 800, 110)
        .route("TPE", "NRT", 2180, 185)
        .route("HKG", "BKK", 1690, 165)
        .route("BKK", "NRT", 4600, 380)
        .route("BKK", "ICN", 3700, 330)
        .route("BKK", "TPE", 2500, 230)
        .route("NRT", "MEX", 11300, 780)
        .route("NRT", "LAX", 8750, 630)
        .route("ICN", "LAX", 9600, 660)
        .route("LAX", "MEX", 2500, 220)
        .route("NRT", "YVR", 7550, 540)
        .route("YVR", "MEX", 3900, 320)
        .route("LAX", "EZE", 9800, 720)
        .visa("HKG", "JPN", VisaRequirement::VisaFree)
        .visa("HKG", "TWN", VisaRequirement::EVisa)
        .visa("HKG", "THA", VisaRequirement::VisaFree)
        .visa("HKG", "KOR", VisaRequirement::VisaFree)
        .visa("HKG", "USA", VisaRequirement::VisaRequired)
        .visa("HKG", "CAN", VisaRequirement::EVisa)
        .visa("HKG", "ARG", VisaRequirement::VisaOnArrival)
        .visa_with_arrangement(
            "HKG",
            "MEX",
            VisaRequirement::VisaRequired,
            "USA",
            "Tourist",
        )
        .visa("JPN", "MEX", VisaRequirement::VisaFree)
        .visa("JPN", "USA", VisaRequirement::EVisa)
        .build()
        .expect("sample network is valid")
}
