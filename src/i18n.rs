//! French/English label table for user-facing text.
//!
//! French is the product's default language and the fallback for any key the
//! English table would miss (both tables are total here, the compiler enforces
//! it). Interpolated labels take their parameters as arguments rather than
//! doing template substitution at runtime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" => Self::En,
            _ => Self::Fr,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Fr => Self::En,
            Self::En => Self::Fr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    AddItem,
    SaveBudget,
    CustomizeTrip,
    NoTrip,
    PlanTrip,
    Logout,
    Profile,
    Budget,
    Items,
    Steps,
    Destination,
    Days,
    People,
    Edit,
    Delete,
    Confirm,
    Cancel,
    Loading,
    Error,
    Success,
    Add,
    Quantity,
    Price,
    Total,
    TripStory,
    ModifyStory,
    AddStory,
    DeleteStory,
    DeleteTrip,
    NoItems,
    NoSteps,
    NotAuthorized,
    BudgetUpdated,
    Home,
    NoStepsToShow,
    CannotOpenMaps,
    StopsSaved,
    RoadTripFetchFailed,
    SaveFailed,
    TripPlanned,
    MissingRequiredFields,
    EmptyStory,
}

#[must_use]
pub fn label(language: Language, key: Label) -> &'static str {
    match language {
        Language::Fr => french(key),
        Language::En => english(key),
    }
}

fn french(key: Label) -> &'static str {
    match key {
        Label::AddItem => "Ajouter un matériel",
        Label::SaveBudget => "Sauvegarder le budget",
        Label::CustomizeTrip => "Personnaliser le Road Trip",
        Label::NoTrip => "Aucun voyage planifié.",
        Label::PlanTrip => "Planifier un voyage",
        Label::Logout => "Se déconnecter",
        Label::Profile => "Profil",
        Label::Budget => "Budget",
        Label::Items => "Matériel",
        Label::Steps => "Étapes",
        Label::Destination => "Destination",
        Label::Days => "Jours",
        Label::People => "Personnes",
        Label::Edit => "Modifier",
        Label::Delete => "Supprimer",
        Label::Confirm => "Confirmer",
        Label::Cancel => "Annuler",
        Label::Loading => "Chargement...",
        Label::Error => "Erreur",
        Label::Success => "Succès",
        Label::Add => "Ajouter",
        Label::Quantity => "Quantité",
        Label::Price => "Prix",
        Label::Total => "Total",
        Label::TripStory => "Histoire",
        Label::ModifyStory => "Modifier mon histoire",
        Label::AddStory => "Ajouter une histoire",
        Label::DeleteStory => "Supprimer l'histoire",
        Label::DeleteTrip => "Supprimer ce voyage",
        Label::NoItems => "Aucun matériel",
        Label::NoSteps => "Aucune étape",
        Label::NotAuthorized => "Veuillez vous reconnecter",
        Label::BudgetUpdated => "Budget mis à jour !",
        Label::Home => "Accueil",
        Label::NoStepsToShow => "Aucune étape à afficher.",
        Label::CannotOpenMaps => "Impossible d'ouvrir l'application Maps.",
        Label::StopsSaved => "Tes étapes personnalisées ont été sauvegardées !",
        Label::RoadTripFetchFailed => "Impossible de récupérer le road trip",
        Label::SaveFailed => "Erreur lors de la sauvegarde",
        Label::TripPlanned => "Voyage planifié avec succès",
        Label::MissingRequiredFields => "Veuillez remplir tous les champs obligatoires",
        Label::EmptyStory => "Le texte de l'histoire ne peut pas être vide.",
    }
}

fn english(key: Label) -> &'static str {
    match key {
        Label::AddItem => "Add item",
        Label::SaveBudget => "Save budget",
        Label::CustomizeTrip => "Customize Road Trip",
        Label::NoTrip => "No trip planned.",
        Label::PlanTrip => "Plan a trip",
        Label::Logout => "Log out",
        Label::Profile => "Profile",
        Label::Budget => "Budget",
        Label::Items => "Items",
        Label::Steps => "Steps",
        Label::Destination => "Destination",
        Label::Days => "Days",
        Label::People => "People",
        Label::Edit => "Edit",
        Label::Delete => "Delete",
        Label::Confirm => "Confirm",
        Label::Cancel => "Cancel",
        Label::Loading => "Loading...",
        Label::Error => "Error",
        Label::Success => "Success",
        Label::Add => "Add",
        Label::Quantity => "Quantity",
        Label::Price => "Price",
        Label::Total => "Total",
        Label::TripStory => "Story",
        Label::ModifyStory => "Edit my story",
        Label::AddStory => "Add a story",
        Label::DeleteStory => "Delete story",
        Label::DeleteTrip => "Delete this trip",
        Label::NoItems => "No items",
        Label::NoSteps => "No steps",
        Label::NotAuthorized => "Please log in again",
        Label::BudgetUpdated => "Budget updated!",
        Label::Home => "Home",
        Label::NoStepsToShow => "No steps to display.",
        Label::CannotOpenMaps => "Unable to open the Maps app.",
        Label::StopsSaved => "Your custom steps have been saved!",
        Label::RoadTripFetchFailed => "Could not fetch the road trip",
        Label::SaveFailed => "Error while saving",
        Label::TripPlanned => "Trip planned successfully",
        Label::MissingRequiredFields => "Please fill in all required fields",
        Label::EmptyStory => "The story text cannot be empty.",
    }
}

#[must_use]
pub fn welcome(language: Language, name: &str) -> String {
    match language {
        Language::Fr => format!("Bienvenue, {name} 👋"),
        Language::En => format!("Welcome, {name} 👋"),
    }
}

#[must_use]
pub fn last_trip(language: Language, destination: &str) -> String {
    match language {
        Language::Fr => format!("Ton dernier voyage : {destination}"),
        Language::En => format!("Your last trip: {destination}"),
    }
}

#[must_use]
pub fn for_people_days(language: Language, people: u32, days: u32) -> String {
    match language {
        Language::Fr => format!("Pour {people} personnes, {days} jours"),
        Language::En => format!("For {people} people, {days} days"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_french() {
        assert_eq!(Language::default(), Language::Fr);
        assert_eq!(label(Language::default(), Label::Error), "Erreur");
    }

    #[test]
    fn unknown_codes_fall_back_to_french() {
        assert_eq!(Language::from_code("de"), Language::Fr);
        assert_eq!(Language::from_code("en"), Language::En);
    }

    #[test]
    fn toggle_flips_between_the_two_languages() {
        assert_eq!(Language::Fr.toggled(), Language::En);
        assert_eq!(Language::En.toggled(), Language::Fr);
    }

    #[test]
    fn interpolated_labels_embed_their_arguments() {
        assert_eq!(welcome(Language::Fr, "Léa"), "Bienvenue, Léa 👋");
        assert_eq!(for_people_days(Language::En, 4, 7), "For 4 people, 7 days");
    }
}
