use serde_json::Value;

use crate::config::validation::Validator;

/// One entry of the static settings table.
#[derive(Debug, Clone, Copy)]
pub struct Setting {
    pub key: &'static str,
    pub default: DefaultValue,
    pub validator: Validator,
}

/// Const-constructible default, converted to a JSON value at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
    None,
}

impl DefaultValue {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Str(text) => Value::String((*text).to_owned()),
            Self::Int(number) => Value::from(*number),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::None => Value::Null,
        }
    }
}

const TEXT_LIST: Validator = Validator::List {
    delimiter: " ",
    element: &Validator::Text,
};
const PIPE_LIST: Validator = Validator::List {
    delimiter: "|",
    element: &Validator::Text,
};
const COMMA_LIST: Validator = Validator::List {
    delimiter: ",",
    element: &Validator::Text,
};

/// The full settings table, sorted by key. Aggregated validation errors
/// report failures in this order.
pub const SETTINGS: &[Setting] = &[
    Setting {
        key: "acl_system",
        default: DefaultValue::Str("dummy"),
        validator: Validator::Text,
    },
    Setting {
        key: "admin_groups",
        default: DefaultValue::Str("proventesters security_respons updatesadmin sysadmin-main"),
        validator: TEXT_LIST,
    },
    Setting {
        key: "admin_packager_groups",
        default: DefaultValue::Str("provenpackager releng security_respons"),
        validator: TEXT_LIST,
    },
    Setting {
        key: "authtkt.secret",
        default: DefaultValue::Str("CHANGEME"),
        validator: Validator::Secret,
    },
    Setting {
        key: "authtkt.secure",
        default: DefaultValue::Bool(true),
        validator: Validator::Bool,
    },
    Setting {
        key: "authtkt.timeout",
        default: DefaultValue::Int(86400),
        validator: Validator::Int,
    },
    Setting {
        key: "badge_ids",
        default: DefaultValue::Str(""),
        validator: PIPE_LIST,
    },
    Setting {
        key: "base_address",
        default: DefaultValue::Str("https://admin.fedoraproject.org/updates/"),
        validator: Validator::Text,
    },
    Setting {
        key: "buglink",
        default: DefaultValue::Str("https://bugzilla.redhat.com/show_bug.cgi?id=%s"),
        validator: Validator::Text,
    },
    Setting {
        key: "bugtracker",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Text),
    },
    Setting {
        key: "buildroot_limit",
        default: DefaultValue::Int(31),
        validator: Validator::Int,
    },
    Setting {
        key: "buildsystem",
        default: DefaultValue::Str("dev"),
        validator: Validator::Text,
    },
    Setting {
        key: "bz_products",
        default: DefaultValue::Str("Fedora,Fedora EPEL"),
        validator: COMMA_LIST,
    },
    Setting {
        key: "bz_server",
        default: DefaultValue::Str("https://bugzilla.redhat.com/xmlrpc.cgi"),
        validator: Validator::Text,
    },
    Setting {
        key: "cache_dir",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Path),
    },
    Setting {
        key: "captcha.background_color",
        default: DefaultValue::Str("#ffffff"),
        validator: Validator::Color,
    },
    Setting {
        key: "captcha.font_color",
        default: DefaultValue::Str("#000000"),
        validator: Validator::Color,
    },
    Setting {
        key: "captcha.font_path",
        default: DefaultValue::Str("/usr/share/fonts/liberation/LiberationMono-Regular.ttf"),
        validator: Validator::Text,
    },
    Setting {
        key: "captcha.font_size",
        default: DefaultValue::Int(36),
        validator: Validator::Int,
    },
    Setting {
        key: "captcha.image_height",
        default: DefaultValue::Int(80),
        validator: Validator::Int,
    },
    Setting {
        key: "captcha.image_width",
        default: DefaultValue::Int(300),
        validator: Validator::Int,
    },
    Setting {
        key: "captcha.padding",
        default: DefaultValue::Int(5),
        validator: Validator::Int,
    },
    Setting {
        key: "captcha.secret",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::FernetKey),
    },
    Setting {
        key: "captcha.ttl",
        default: DefaultValue::Int(300),
        validator: Validator::Int,
    },
    Setting {
        key: "comps_dir",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Path),
    },
    Setting {
        key: "comps_url",
        default: DefaultValue::Str("https://git.fedorahosted.org/cgit/comps.git"),
        validator: Validator::TlsUrl,
    },
    Setting {
        key: "cors_connect_src",
        default: DefaultValue::Str("https://*.fedoraproject.org/ wss://hub.fedoraproject.org:9939/"),
        validator: Validator::Text,
    },
    Setting {
        key: "cors_origins_ro",
        default: DefaultValue::Str("*"),
        validator: Validator::Text,
    },
    Setting {
        key: "cors_origins_rw",
        default: DefaultValue::Str("https://admin.fedoraproject.org"),
        validator: Validator::Text,
    },
    Setting {
        key: "critpath.min_karma",
        default: DefaultValue::Int(2),
        validator: Validator::Int,
    },
    Setting {
        key: "critpath.num_admin_approvals",
        default: DefaultValue::Int(2),
        validator: Validator::Int,
    },
    Setting {
        key: "critpath.stable_after_days_without_negative_karma",
        default: DefaultValue::Int(14),
        validator: Validator::Int,
    },
    Setting {
        key: "critpath.type",
        default: DefaultValue::Str("pdc"),
        validator: Validator::Text,
    },
    Setting {
        key: "critpath_pkgs",
        default: DefaultValue::Str(""),
        validator: TEXT_LIST,
    },
    Setting {
        key: "datagrepper_url",
        default: DefaultValue::Str("https://apps.fedoraproject.org/datagrepper"),
        validator: Validator::Text,
    },
    Setting {
        key: "default_email_domain",
        default: DefaultValue::Str("fedoraproject.org"),
        validator: Validator::Text,
    },
    Setting {
        key: "fedmenu.data_url",
        default: DefaultValue::Str("https://apps.fedoraproject.org/js/data.js"),
        validator: Validator::Text,
    },
    Setting {
        key: "fedmenu.url",
        default: DefaultValue::Str("https://apps.fedoraproject.org/fedmenu"),
        validator: Validator::Text,
    },
    Setting {
        key: "fedmsg_enabled",
        default: DefaultValue::Bool(false),
        validator: Validator::Bool,
    },
    Setting {
        key: "file_url",
        default: DefaultValue::Str("https://download.fedoraproject.org/pub/fedora/linux/updates/"),
        validator: Validator::Text,
    },
    Setting {
        key: "fmn_url",
        default: DefaultValue::Str("https://apps.fedoraproject.org/notifications/"),
        validator: Validator::Text,
    },
    Setting {
        key: "important_groups",
        default: DefaultValue::Str(
            "proventesters provenpackager releng security_respons packager updatesadmin",
        ),
        validator: TEXT_LIST,
    },
    Setting {
        key: "koji_hub",
        default: DefaultValue::Str("https://koji.fedoraproject.org/kojihub"),
        validator: Validator::Text,
    },
    Setting {
        key: "koji_web_url",
        default: DefaultValue::Str("https://koji.fedoraproject.org/koji/"),
        validator: Validator::TlsUrl,
    },
    Setting {
        key: "krb_ccache",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Text),
    },
    Setting {
        key: "krb_keytab",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Text),
    },
    Setting {
        key: "krb_principal",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Text),
    },
    Setting {
        key: "legal_link",
        default: DefaultValue::Str(""),
        validator: Validator::Text,
    },
    Setting {
        key: "libravatar_dns",
        default: DefaultValue::Bool(false),
        validator: Validator::Bool,
    },
    Setting {
        key: "libravatar_enabled",
        default: DefaultValue::Bool(true),
        validator: Validator::Bool,
    },
    Setting {
        key: "mail.templates_basepath",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Path),
    },
    Setting {
        key: "mash_dir",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Path),
    },
    Setting {
        key: "mash_stage_dir",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Path),
    },
    Setting {
        key: "max_update_length_for_ui",
        default: DefaultValue::Int(30),
        validator: Validator::Int,
    },
    Setting {
        key: "message_id_email_domain",
        default: DefaultValue::Str("admin.fedoraproject.org"),
        validator: Validator::Text,
    },
    Setting {
        key: "openid.provider",
        default: DefaultValue::Str("https://id.fedoraproject.org/openid/"),
        validator: Validator::Text,
    },
    Setting {
        key: "openid.url",
        default: DefaultValue::Str("https://id.fedoraproject.org/"),
        validator: Validator::Text,
    },
    Setting {
        key: "openid_template",
        default: DefaultValue::Str("{username}.id.fedoraproject.org"),
        validator: Validator::Text,
    },
    Setting {
        key: "pagure_url",
        default: DefaultValue::Str("https://src.fedoraproject.org/pagure/"),
        validator: Validator::TlsUrl,
    },
    Setting {
        key: "pdc_url",
        default: DefaultValue::Str("https://pdc.fedoraproject.org/"),
        validator: Validator::TlsUrl,
    },
    Setting {
        key: "query_wiki_test_cases",
        default: DefaultValue::Bool(false),
        validator: Validator::Bool,
    },
    Setting {
        key: "release_team_address",
        default: DefaultValue::Str("updates-team@fedoraproject.org"),
        validator: Validator::Text,
    },
    Setting {
        key: "resultsdb_api_url",
        default: DefaultValue::Str("https://taskotron.fedoraproject.org/resultsdb_api/"),
        validator: Validator::Text,
    },
    Setting {
        key: "session.secret",
        default: DefaultValue::Str("CHANGEME"),
        validator: Validator::Secret,
    },
    Setting {
        key: "site_requirements",
        default: DefaultValue::Str("dist.rpmdeplint dist.upgradepath"),
        validator: TEXT_LIST,
    },
    Setting {
        key: "smtp_server",
        default: DefaultValue::None,
        validator: Validator::NoneOr(&Validator::Text),
    },
    Setting {
        key: "stable_karma",
        default: DefaultValue::Int(3),
        validator: Validator::Int,
    },
    Setting {
        key: "stacks_enabled",
        default: DefaultValue::Bool(false),
        validator: Validator::Bool,
    },
    Setting {
        key: "stats_exclude_users",
        default: DefaultValue::Str("anonymous autoqa taskotron"),
        validator: TEXT_LIST,
    },
    Setting {
        key: "test_case_base_url",
        default: DefaultValue::Str("https://fedoraproject.org/wiki/"),
        validator: Validator::Text,
    },
    Setting {
        key: "top_testers_timeframe",
        default: DefaultValue::Int(7),
        validator: Validator::Int,
    },
    Setting {
        key: "unstable_karma",
        default: DefaultValue::Int(-3),
        validator: Validator::Int,
    },
    Setting {
        key: "wait_for_repo_sig",
        default: DefaultValue::Bool(false),
        validator: Validator::Bool,
    },
    Setting {
        key: "wiki_url",
        default: DefaultValue::Str("https://fedoraproject.org/wiki"),
        validator: Validator::Text,
    },
];

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DefaultValue, SETTINGS};

    #[test]
    fn table_is_sorted_by_key() {
        for pair in SETTINGS.windows(2) {
            assert!(
                pair[0].key < pair[1].key,
                "'{}' must sort before '{}'",
                pair[0].key,
                pair[1].key
            );
        }
    }

    #[test]
    fn table_keys_are_unique() {
        let mut keys: Vec<_> = SETTINGS.iter().map(|setting| setting.key).collect();
        keys.dedup();
        assert_eq!(keys.len(), SETTINGS.len());
    }

    #[test]
    fn defaults_pass_their_own_validators() {
        for setting in SETTINGS {
            if setting.default == DefaultValue::Str("CHANGEME") {
                continue;
            }
            let default = setting.default.to_value();
            setting
                .validator
                .apply(&default)
                .unwrap_or_else(|reason| panic!("{}: {reason}", setting.key));
        }
    }

    #[test]
    fn validated_defaults_are_stable() {
        for setting in SETTINGS {
            if setting.default == DefaultValue::Str("CHANGEME") {
                continue;
            }
            let once = setting.validator.apply(&setting.default.to_value()).unwrap();
            let twice = setting.validator.apply(&once).unwrap();
            assert_eq!(once, twice, "{} must be stable", setting.key);
        }
    }

    #[test]
    fn expected_spot_defaults() {
        let by_key = |key: &str| {
            SETTINGS
                .iter()
                .find(|setting| setting.key == key)
                .unwrap_or_else(|| panic!("missing table entry '{key}'"))
        };

        assert_eq!(by_key("top_testers_timeframe").default.to_value(), json!(7));
        assert_eq!(by_key("fedmsg_enabled").default.to_value(), json!(false));
        assert_eq!(by_key("session.secret").default.to_value(), json!("CHANGEME"));
        assert_eq!(by_key("authtkt.secret").default.to_value(), json!("CHANGEME"));
        assert_eq!(
            by_key("wiki_url").default.to_value(),
            json!("https://fedoraproject.org/wiki")
        );
    }
}
