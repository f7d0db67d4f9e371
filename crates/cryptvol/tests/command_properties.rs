//! Property tests for credential flags in mount commands.
use cryptvol::container::{
    ContainerConfig, EMPTY_PASSWORD_FLAG, KEYFILE_FLAG, PASSWORD_FLAG, build_dismount_command,
    build_mount_command,
};
use proptest::prelude::*;

fn config(
    mount_id: &str,
    password: Option<&str>,
    keyfile: Option<&str>,
) -> ContainerConfig {
    let mut config = ContainerConfig::new("/opt/veracrypt/veracrypt", "/vaults/vault.hc", mount_id);
    if let Some(password) = password {
        config = config.with_password(password);
    }
    if let Some(keyfile) = keyfile {
        config = config.with_keyfile(keyfile);
    }
    config
}

proptest! {
    #[test]
    fn no_credentials_ends_with_empty_password(id in "[A-Z]") {
        let cmd = build_mount_command(&config(&id, None, None)).unwrap();
        prop_assert_eq!(cmd.as_slice().last().map(String::as_str), Some(EMPTY_PASSWORD_FLAG));
        prop_assert!(!cmd.contains_flag(KEYFILE_FLAG));
    }

    #[test]
    fn password_replaces_empty_password_flag(
        id in "[A-Z]",
        password in "[a-zA-Z0-9 !@#]{1,24}",
        keyfile in proptest::option::of("/keys/[a-z]{1,8}\\.key"),
    ) {
        let cmd = build_mount_command(&config(&id, Some(&password), keyfile.as_deref())).unwrap();
        prop_assert_eq!(cmd.flag_value(PASSWORD_FLAG), Some(password.as_str()));
        prop_assert!(!cmd.contains_flag(EMPTY_PASSWORD_FLAG));
        prop_assert_eq!(cmd.contains_flag(KEYFILE_FLAG), keyfile.is_some());
    }

    #[test]
    fn keyfile_alone_keeps_empty_password(id in "[A-Z]", keyfile in "/keys/[a-z]{1,8}\\.key") {
        let cmd = build_mount_command(&config(&id, None, Some(&keyfile))).unwrap();
        prop_assert_eq!(cmd.flag_value(KEYFILE_FLAG), Some(keyfile.as_str()));
        prop_assert_eq!(cmd.as_slice().last().map(String::as_str), Some(EMPTY_PASSWORD_FLAG));
    }

    #[test]
    fn building_is_deterministic(
        id in "[A-Z]",
        password in proptest::option::of("[a-z]{1,12}"),
    ) {
        let config = config(&id, password.as_deref(), None);
        prop_assert_eq!(build_mount_command(&config).unwrap(), build_mount_command(&config).unwrap());
        prop_assert_eq!(
            build_dismount_command(&config).unwrap(),
            build_dismount_command(&config).unwrap()
        );
    }

    #[test]
    fn redacted_never_shows_password(password in "pw-[a-zA-Z0-9]{4,20}") {
        let cmd = build_mount_command(&config("Z", Some(&password), None)).unwrap();
        prop_assert!(!cmd.redacted().to_string().contains(&password));
    }
}
