//! Spoken names for well-known packages.

/// `(spoken names, package id)`. Names are lower-case.
const ALIASES: &[(&[&str], &str)] = &[
    (&["whatsapp"], "com.whatsapp"),
    (&["facebook"], "com.facebook.katana"),
    (&["messenger", "facebook messenger"], "com.facebook.orca"),
    (&["instagram"], "com.instagram.android"),
    (&["youtube"], "com.google.android.youtube"),
    (&["maps", "google maps"], "com.google.android.apps.maps"),
    (&["chrome", "google chrome"], "com.android.chrome"),
    (&["camera"], "com.android.camera2"),
    (
        &["gallery", "photos", "google photos"],
        "com.google.android.apps.photos",
    ),
    (&["phone", "dialer"], "com.android.dialer"),
    (&["messages", "sms"], "com.android.messaging"),
    (&["settings"], "com.android.settings"),
    (&["play store", "google play"], "com.android.vending"),
    (&["gmail", "email"], "com.google.android.gm"),
    (&["calendar"], "com.google.android.calendar"),
    (&["clock", "alarm"], "com.android.deskclock"),
    (&["calculator"], "com.android.calculator2"),
    (&["files", "file manager"], "com.android.documentsui"),
    (&["contacts"], "com.android.contacts"),
    (&["twitter", "x"], "com.twitter.android"),
    (&["telegram"], "org.telegram.messenger"),
    (&["snapchat"], "com.snapchat.android"),
    (&["tiktok"], "com.zhiliaoapp.musically"),
    (&["netflix"], "com.netflix.mediaclient"),
    (&["spotify"], "com.spotify.music"),
    (&["google"], "com.google.android.googlequicksearchbox"),
    (&["drive", "google drive"], "com.google.android.apps.docs"),
    (&["meet", "google meet"], "com.google.android.apps.meetings"),
    (&["duo", "google duo"], "com.google.android.apps.tachyon"),
    (&["keep", "google keep"], "com.google.android.keep"),
    (&["lens", "google lens"], "com.google.ar.lens"),
    (
        &["translate", "google translate"],
        "com.google.android.apps.translate",
    ),
    (&["waze"], "com.waze"),
    (&["outlook"], "com.microsoft.office.outlook"),
    (&["teams", "microsoft teams"], "com.microsoft.teams"),
    (&["word", "microsoft word"], "com.microsoft.office.word"),
    (&["excel", "microsoft excel"], "com.microsoft.office.excel"),
    (
        &["powerpoint", "microsoft powerpoint"],
        "com.microsoft.office.powerpoint",
    ),
    (&["onedrive", "microsoft onedrive"], "com.microsoft.skydrive"),
    (&["skype"], "com.skype.raider"),
    (&["linkedin"], "com.linkedin.android"),
    (&["pinterest"], "com.pinterest"),
    (&["reddit"], "com.reddit.frontpage"),
    (&["twitch"], "tv.twitch.android.app"),
    (&["discord"], "com.discord"),
    (&["zoom"], "us.zoom.videomeetings"),
    (&["uber"], "com.ubercab"),
    (&["lyft"], "me.lyft.android"),
    (&["amazon"], "com.amazon.mShop.android.shopping"),
    (&["ebay"], "com.ebay.mobile"),
    (&["paypal"], "com.paypal.android.p2pmobile"),
    (&["venmo"], "com.venmo"),
    (&["cash", "cash app"], "com.squareup.cash"),
    (&["bank of america", "bofa"], "com.infonow.bofa"),
    (&["chase"], "com.chase.sig.android"),
    (&["wells fargo"], "com.wf.wellsfargomobile"),
    (&["citi", "citibank"], "com.citi.citimobile"),
];

/// Package id for a spoken name, matched case-insensitively.
pub fn alias_for(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(names, _)| names.contains(&name.as_str()))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup() {
        assert_eq!(alias_for("WhatsApp"), Some("com.whatsapp"));
        assert_eq!(alias_for(" google maps "), Some("com.google.android.apps.maps"));
        assert_eq!(alias_for("photos"), Some("com.google.android.apps.photos"));
        assert_eq!(alias_for("whats app"), None);
    }

    #[test]
    fn test_alias_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for (names, _) in ALIASES {
            for name in *names {
                assert!(seen.insert(*name), "duplicate alias {name}");
                assert_eq!(*name, name.to_lowercase());
            }
        }
    }
}
