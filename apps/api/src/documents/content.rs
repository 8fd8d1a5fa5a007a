//! Pluggable source of synthetic field values.
//!
//! Rendering only ever asks a `ContentSource` for values, so tests and batch
//! jobs can substitute a seeded generator and get byte-for-byte repeatable
//! documents. `FakeContent` is the default, backed by the `fake` crate.

use chrono::{Datelike, Local, NaiveDate};
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait ContentSource {
    /// Short upper-case document identifier, e.g. `3FA85F64`.
    fn identifier(&mut self) -> String;
    /// A date in the current year, no later than today.
    fn date(&mut self) -> NaiveDate;
    fn person_name(&mut self) -> String;
    fn company(&mut self) -> String;
    /// Single-line postal address.
    fn address(&mut self) -> String;
    fn phone(&mut self) -> String;
    fn catch_phrase(&mut self) -> String;
    /// Uniform integer in `[lo, hi]`.
    fn int_in(&mut self, lo: u32, hi: u32) -> u32;
    /// Uniform float in `[lo, hi]`.
    fn float_in(&mut self, lo: f64, hi: f64) -> f64;
}

/// Faker-backed content over an injectable RNG.
pub struct FakeContent<R: Rng = StdRng> {
    rng: R,
}

impl FakeContent<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Seeded when `seed` is set, process randomness otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> FakeContent<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ContentSource for FakeContent<R> {
    fn identifier(&mut self) -> String {
        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        id.simple().to_string()[..8].to_uppercase()
    }

    fn date(&mut self) -> NaiveDate {
        let today = Local::now().date_naive();
        let ordinal = self.rng.gen_range(1..=today.ordinal());
        NaiveDate::from_yo_opt(today.year(), ordinal).unwrap_or(today)
    }

    fn person_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn company(&mut self) -> String {
        CompanyName().fake_with_rng(&mut self.rng)
    }

    fn address(&mut self) -> String {
        let building: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let city: String = CityName().fake_with_rng(&mut self.rng);
        let state: String = StateAbbr().fake_with_rng(&mut self.rng);
        let zip: String = ZipCode().fake_with_rng(&mut self.rng);
        format!("{building} {street}, {city}, {state} {zip}")
    }

    fn phone(&mut self) -> String {
        PhoneNumber().fake_with_rng(&mut self.rng)
    }

    fn catch_phrase(&mut self) -> String {
        CatchPhrase().fake_with_rng(&mut self.rng)
    }

    fn int_in(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }

    fn float_in(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..=hi)
    }
}
