//! Behavior tests for `RevocationRegistryController` against the in-memory
//! registry.
//!
//! ## Coverage
//!
//! | Area | Tests |
//! |------|-------|
//! | Construction and binding precedence | `construction_*` |
//! | Validation before remote calls | `malformed_*` |
//! | Live and historical queries | `live_*`, `historical_*` |
//! | Bulk updates | `bulk_*` |
//! | Delegates | `add_list_delegate_*` |
//! | Signed operations | `signed_*` |
//! | Signing domain | `signing_domain_*` |

use alloy_primitives::hex;
use chrono::{Duration, TimeZone, Utc};
use revreg_client::mock::{MockRegistryContract, MockSigner, RecordedCall};
use revreg_client::signed::status_change_typed_data;
use revreg_client::{
    ChainSelector, ContractBinding, ControllerConfig, IsRevokedOptions, JsonRpcProvider,
    JsonRpcSigner, RegistryContract, RegistryError, RevocationRegistryController,
};
use revreg_core::validation::validate_revocation_key_path;
use revreg_core::{
    Address, BlockTag, KeyLocation, RevocationKeyInstruction, RevocationKeyPath,
    RevocationListPath, ValidationError,
};
use revreg_crypto::SigningSchema;

const OWNER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const LIST: &str = "0x3458b9bfc7963978b7d40ef225177c45193c2889902357db3b043a4e319a9628";
const KEY_1: &str = "0x89343794d2fb7dd5d0fba9593a4bb13beaff93a61577029176d0117b0c53b8e6";
const KEY_2: &str = "0x4d2e5f5b8a3f4b9f8d3c2b1a0f9e8d7c6b5a49382716050403020100ffeeddcc";

type TestController = RevocationRegistryController<MockRegistryContract, MockSigner>;

fn key_path() -> RevocationKeyPath {
    RevocationKeyPath::new(OWNER, LIST, KEY_1)
}

fn list_path() -> RevocationListPath {
    RevocationListPath::new(OWNER, LIST)
}

fn key_location() -> KeyLocation {
    validate_revocation_key_path(&key_path()).unwrap()
}

fn owner() -> Address {
    OWNER.parse().unwrap()
}

fn controller(contract: MockRegistryContract) -> TestController {
    let config = ControllerConfig::new()
        .with_contract(contract)
        .with_signer(MockSigner::new(owner()));
    RevocationRegistryController::new(config).unwrap()
}

fn unsigned_controller(contract: MockRegistryContract) -> RevocationRegistryController<MockRegistryContract> {
    RevocationRegistryController::new(ControllerConfig::new().with_contract(contract)).unwrap()
}

fn mock(controller: &TestController) -> &MockRegistryContract {
    match controller.registry() {
        ContractBinding::Injected(contract) => contract,
        ContractBinding::JsonRpc(_) => panic!("expected injected contract"),
    }
}

fn node_provider(url: &str) -> JsonRpcProvider {
    JsonRpcProvider::new(url.parse().unwrap(), ChainSelector::Any, std::time::Duration::from_secs(5))
        .unwrap()
}

fn bound_endpoint<C: RegistryContract, S: revreg_client::TypedDataSigner>(
    controller: &RevocationRegistryController<C, S>,
) -> String {
    match controller.registry() {
        ContractBinding::JsonRpc(registry) => registry.provider().url().to_string(),
        ContractBinding::Injected(_) => panic!("expected a JSON-RPC binding"),
    }
}

fn malformed_key_paths() -> Vec<RevocationKeyPath> {
    vec![
        RevocationKeyPath::new("", LIST, KEY_1),
        RevocationKeyPath::new("0x1234", LIST, KEY_1),
        RevocationKeyPath::new(OWNER, "", KEY_1),
        RevocationKeyPath::new(OWNER, "0xabc", KEY_1),
        RevocationKeyPath::new(OWNER, LIST, ""),
        RevocationKeyPath::new(OWNER, LIST, "0x1234"),
        RevocationKeyPath::new(OWNER, LIST, format!("{}zz", &KEY_1[..64])),
    ]
}

fn malformed_list_paths() -> Vec<RevocationListPath> {
    vec![
        RevocationListPath::new("", LIST),
        RevocationListPath::new("not-an-address", LIST),
        RevocationListPath::new(OWNER, ""),
        RevocationListPath::new(OWNER, "0x00"),
    ]
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn construction_without_contract_provider_or_url_fails() {
    let result = RevocationRegistryController::new(ControllerConfig::new());
    assert!(matches!(result, Err(RegistryError::Configuration(_))));
}

#[test]
fn construction_with_rpc_url_validates_registry_address() {
    let config = ControllerConfig::new()
        .with_rpc_url("http://127.0.0.1:8545".parse().unwrap())
        .with_address("0x123");
    let result = RevocationRegistryController::new(config);
    assert!(matches!(result, Err(RegistryError::Validation(_))));
}

#[test]
fn construction_with_rpc_url_defaults_to_zero_address() {
    let config = ControllerConfig::new().with_rpc_url("http://127.0.0.1:8545".parse().unwrap());
    let controller = RevocationRegistryController::new(config).unwrap();
    assert_eq!(controller.registry_address(), Address::ZERO);
}

#[test]
fn construction_prefers_injected_contract() {
    let contract = MockRegistryContract::new(Address::repeat_byte(0x42));
    let config = ControllerConfig::new()
        .with_contract(contract)
        .with_address("not validated for injected contracts");
    let controller = RevocationRegistryController::new(config).unwrap();
    assert_eq!(controller.registry_address(), Address::repeat_byte(0x42));
}

#[test]
fn construction_falls_back_to_the_signers_connection() {
    let signer = JsonRpcSigner::new(node_provider("http://127.0.0.1:8545"));
    let config = ControllerConfig::new().with_signer(signer);
    assert!(config.rpc_url.is_none() && config.provider.is_none());

    let controller = RevocationRegistryController::new(config).unwrap();
    assert!(matches!(controller.registry(), ContractBinding::JsonRpc(_)));
    assert_eq!(bound_endpoint(&controller), "http://127.0.0.1:8545/");
    assert_eq!(controller.registry_address(), Address::ZERO);
}

#[test]
fn construction_prefers_provider_over_rpc_url() {
    let config = ControllerConfig::new()
        .with_provider(node_provider("http://127.0.0.1:8545"))
        .with_rpc_url("http://unreachable.invalid:1/v3/key".parse().unwrap())
        .with_chain(ChainSelector::Id(1));
    let controller = RevocationRegistryController::new(config).unwrap();
    assert_eq!(bound_endpoint(&controller), "http://127.0.0.1:8545/");
}

#[test]
fn construction_prefers_provider_over_signer_connection() {
    let signer = JsonRpcSigner::new(node_provider("http://127.0.0.2:8545"));
    let config = ControllerConfig::new()
        .with_provider(node_provider("http://127.0.0.1:8545"))
        .with_signer(signer);
    let controller = RevocationRegistryController::new(config).unwrap();
    assert_eq!(bound_endpoint(&controller), "http://127.0.0.1:8545/");
}

// ── Validation before remote calls ──────────────────────────────────

#[tokio::test]
async fn malformed_key_paths_never_reach_the_contract() {
    let controller = controller(MockRegistryContract::default());
    let future = Utc::now() + Duration::days(1);
    for path in malformed_key_paths() {
        let results = [
            controller.is_revoked(&path, IsRevokedOptions::default()).await.err(),
            controller
                .is_revoked(&path, IsRevokedOptions::at(Utc::now()))
                .await
                .err(),
            controller.change_status(true, &path).await.err(),
            controller.change_status_delegated(true, &path).await.err(),
            controller
                .generate_change_status_signed_payload(true, &path)
                .await
                .err(),
            controller
                .generate_change_status_delegated_signed_payload(true, &path)
                .await
                .err(),
        ];
        for result in results {
            assert!(
                matches!(result, Some(RegistryError::Validation(_))),
                "{path:?} gave {result:?}"
            );
        }
    }
    for path in malformed_list_paths() {
        let instructions = [RevocationKeyInstruction::new(KEY_1, true)];
        let results = [
            controller.change_statuses_in_list(&path, &instructions).await.err(),
            controller
                .change_statuses_in_list_delegated(&path, &instructions)
                .await
                .err(),
            controller.change_list_owner(&path, OWNER).await.err(),
            controller.add_list_delegate(&path, OWNER, future).await.err(),
            controller.remove_list_delegate(&path, OWNER).await.err(),
        ];
        for result in results {
            assert!(
                matches!(result, Some(RegistryError::Validation(_))),
                "{path:?} gave {result:?}"
            );
        }
    }
    assert!(mock(&controller).calls().is_empty());
}

#[tokio::test]
async fn malformed_signed_operations_never_reach_the_contract() {
    let controller = controller(MockRegistryContract::default());
    let valid = controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap();
    let calls_before = mock(&controller).calls().len();

    let mut no_revoked = valid.clone();
    no_revoked.revoked = None;
    let mut bad_signer = valid.clone();
    bad_signer.signer = "0xnope".into();
    let mut bad_signature = valid.clone();
    bad_signature.signature = "deadbeef".into();
    let mut no_nonce = valid.clone();
    no_nonce.nonce = None;
    let mut bad_path = valid.clone();
    bad_path.revocation_key_path.list = "0x01".into();

    for op in [no_revoked, bad_signer, bad_signature, no_nonce, bad_path] {
        let result = controller.change_status_signed(&op).await;
        assert!(matches!(result, Err(RegistryError::Validation(_))), "{op:?}");
        let result = controller.change_status_delegated_signed(&op).await;
        assert!(matches!(result, Err(RegistryError::Validation(_))), "{op:?}");
    }
    assert_eq!(mock(&controller).calls().len(), calls_before);
}

#[tokio::test]
async fn malformed_delegate_and_owner_addresses_are_rejected() {
    let controller = controller(MockRegistryContract::default());
    let err = controller
        .change_list_owner(&list_path(), "0xd8da6bf26964af9d7eed9e03e53415d37aa9604")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(ValidationError::InvalidAddress { field: "newOwner", .. })));
    let err = controller
        .remove_list_delegate(&list_path(), "0xD8da6bf26964aF9D7eEd9e03E53415D37aA96045")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(ValidationError::BadChecksum { .. })));
    assert!(mock(&controller).writes().is_empty());
}

// ── Live and historical queries ─────────────────────────────────────

#[tokio::test]
async fn live_query_returns_contract_answer_at_latest_by_default() {
    let contract = MockRegistryContract::default();
    contract.set_is_revoked(BlockTag::Latest, Some(true));
    let controller = controller(contract);

    assert!(controller
        .is_revoked(&key_path(), IsRevokedOptions::default())
        .await
        .unwrap());
    assert_eq!(
        mock(&controller).calls(),
        vec![RecordedCall::IsRevoked {
            key: key_location(),
            block_tag: BlockTag::Latest,
        }]
    );
}

#[tokio::test]
async fn live_query_forwards_block_tag() {
    let contract = MockRegistryContract::default();
    contract.set_is_revoked(BlockTag::Number(1_234), Some(false));
    let controller = controller(contract);

    let revoked = controller
        .is_revoked(&key_path(), IsRevokedOptions::at_block(BlockTag::Number(1_234)))
        .await
        .unwrap();
    assert!(!revoked);
}

#[tokio::test]
async fn live_query_without_answer_is_a_query_error() {
    let contract = MockRegistryContract::default();
    contract.set_is_revoked(BlockTag::Finalized, None);
    let controller = controller(contract);

    let err = controller
        .is_revoked(&key_path(), IsRevokedOptions::at_block(BlockTag::Finalized))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Query {
            block_tag: BlockTag::Finalized
        }
    ));
}

#[tokio::test]
async fn historical_key_event_before_t_revokes() {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let contract = MockRegistryContract::default();
    contract.push_key_event(key_location(), true, (t.timestamp() - 10) as u64, 100, 0);
    let controller = controller(contract);

    assert!(controller
        .is_revoked(&key_path(), IsRevokedOptions::at(t))
        .await
        .unwrap());
    let before = t - Duration::seconds(20);
    assert!(!controller
        .is_revoked(&key_path(), IsRevokedOptions::at(before))
        .await
        .unwrap());
}

#[tokio::test]
async fn historical_list_event_applies_without_key_events() {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let contract = MockRegistryContract::default();
    contract.push_list_event(key_location().list_location(), true, (t.timestamp() - 5) as u64, 100, 0);
    let controller = controller(contract);

    assert!(controller
        .is_revoked(&key_path(), IsRevokedOptions::at(t))
        .await
        .unwrap());
}

#[tokio::test]
async fn historical_timestamp_takes_precedence_over_block_tag() {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let contract = MockRegistryContract::default();
    contract.set_is_revoked(BlockTag::Latest, Some(true));
    let controller = controller(contract);

    let options = IsRevokedOptions {
        timestamp: Some(t),
        block_tag: Some(BlockTag::Latest),
    };
    assert!(!controller.is_revoked(&key_path(), options).await.unwrap());
    assert_eq!(
        mock(&controller).count(|c| matches!(c, RecordedCall::IsRevoked { .. })),
        0
    );
}

#[tokio::test]
async fn historical_query_ignores_other_keys() {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let contract = MockRegistryContract::default();
    let mut other = key_location();
    other.key = KEY_2.parse().unwrap();
    contract.push_key_event(other, true, (t.timestamp() - 10) as u64, 100, 0);
    let controller = controller(contract);

    assert!(!controller
        .is_revoked(&key_path(), IsRevokedOptions::at(t))
        .await
        .unwrap());
}

#[tokio::test]
async fn historical_event_fetch_failure_is_a_fetch_error() {
    let t = Utc::now();
    let contract = MockRegistryContract::default();
    contract.push_key_event(key_location(), true, 1, 1, 0);
    contract.fail_list_events();
    let controller = controller(contract);

    let err = controller
        .is_revoked(&key_path(), IsRevokedOptions::at(t))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Fetch { .. }));
}

#[tokio::test]
async fn historical_timestamp_failure_is_a_fetch_error() {
    let contract = MockRegistryContract::default();
    contract.push_key_event(key_location(), true, 1, 1, 0);
    contract.fail_block_timestamps();
    let controller = controller(contract);

    let err = controller
        .is_revoked(&key_path(), IsRevokedOptions::at(Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Fetch { .. }));
}

#[tokio::test]
async fn historical_query_looks_up_each_block_once() {
    let contract = MockRegistryContract::default();
    contract.push_key_event(key_location(), true, 50, 7, 0);
    contract.push_key_event(key_location(), false, 50, 7, 1);
    contract.push_list_event(key_location().list_location(), false, 50, 7, 2);
    let controller = controller(contract);

    let at = Utc.timestamp_opt(60, 0).unwrap();
    let revoked = controller
        .is_revoked(&key_path(), IsRevokedOptions::at(at))
        .await
        .unwrap();
    // the later log in the same block wins
    assert!(!revoked);
    assert!(
        mock(&controller).count(|c| matches!(c, RecordedCall::BlockTimestamp(_))) <= 2,
        "one lookup per distinct block per event collection"
    );
}

// ── Direct writes ───────────────────────────────────────────────────

#[tokio::test]
async fn change_status_forwards_validated_key() {
    let controller = controller(MockRegistryContract::default());
    controller.change_status(true, &key_path()).await.unwrap();
    controller.change_status_delegated(false, &key_path()).await.unwrap();
    assert_eq!(
        mock(&controller).writes(),
        vec![
            RecordedCall::ChangeStatus {
                revoked: true,
                key: key_location(),
                delegated: false,
            },
            RecordedCall::ChangeStatus {
                revoked: false,
                key: key_location(),
                delegated: true,
            },
        ]
    );
}

#[tokio::test]
async fn list_owner_and_delegate_removal_forward_addresses() {
    let controller = controller(MockRegistryContract::default());
    let new_owner = Address::repeat_byte(0x01);
    controller
        .change_list_owner(&list_path(), &new_owner.to_checksum(None))
        .await
        .unwrap();
    controller
        .remove_list_delegate(&list_path(), &hex::encode_prefixed(new_owner))
        .await
        .unwrap();
    let list = key_location().list_location();
    assert_eq!(
        mock(&controller).writes(),
        vec![
            RecordedCall::ChangeListOwner { list, new_owner },
            RecordedCall::RemoveListDelegate {
                list,
                delegate: new_owner,
            },
        ]
    );
}

// ── Bulk updates ────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_update_preserves_instruction_order() {
    let controller = controller(MockRegistryContract::default());
    let instructions = [
        RevocationKeyInstruction::new(KEY_1, true),
        RevocationKeyInstruction::new(KEY_2, true),
    ];
    controller
        .change_statuses_in_list(&list_path(), &instructions)
        .await
        .unwrap();
    assert_eq!(
        mock(&controller).writes(),
        vec![RecordedCall::ChangeStatusesInList {
            revoked: vec![true, true],
            list: key_location().list_location(),
            keys: vec![KEY_1.parse().unwrap(), KEY_2.parse().unwrap()],
            delegated: false,
        }]
    );
}

#[tokio::test]
async fn bulk_update_rejects_whole_batch_on_one_bad_instruction() {
    let controller = controller(MockRegistryContract::default());
    let mut unset = RevocationKeyInstruction::new(KEY_2, false);
    unset.revoked = None;
    let instructions = [RevocationKeyInstruction::new(KEY_1, true), unset];
    let err = controller
        .change_statuses_in_list_delegated(&list_path(), &instructions)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::Missing { .. })
    ));
    assert!(mock(&controller).calls().is_empty());
}

#[tokio::test]
async fn bulk_update_delegated_uses_delegated_entry_point() {
    let controller = controller(MockRegistryContract::default());
    let instructions = [RevocationKeyInstruction::new(KEY_2, false)];
    controller
        .change_statuses_in_list_delegated(&list_path(), &instructions)
        .await
        .unwrap();
    assert!(matches!(
        mock(&controller).writes().as_slice(),
        [RecordedCall::ChangeStatusesInList { delegated: true, .. }]
    ));
}

// ── Delegates ───────────────────────────────────────────────────────

#[tokio::test]
async fn add_list_delegate_forwards_expiry_in_seconds() {
    let controller = controller(MockRegistryContract::default());
    let expiry = Utc::now() + Duration::days(30);
    let delegate = Address::repeat_byte(0x07);
    controller
        .add_list_delegate(&list_path(), &hex::encode_prefixed(delegate), expiry)
        .await
        .unwrap();
    assert_eq!(
        mock(&controller).writes(),
        vec![RecordedCall::AddListDelegate {
            list: key_location().list_location(),
            delegate,
            expiry: expiry.timestamp() as u64,
        }]
    );
}

#[tokio::test]
async fn add_list_delegate_rejects_past_expiry_without_calling_contract() {
    let controller = controller(MockRegistryContract::default());
    let expiry = Utc::now() - Duration::hours(1);
    let err = controller
        .add_list_delegate(&list_path(), OWNER, expiry)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::ExpiryNotInFuture { .. })
    ));
    assert!(mock(&controller).calls().is_empty());
}

// ── Signed operations ───────────────────────────────────────────────

#[tokio::test]
async fn signed_payload_requires_a_signer() {
    let controller = unsigned_controller(MockRegistryContract::default());
    let err = controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Configuration(_)));
}

#[tokio::test]
async fn signed_payload_binds_current_nonce_and_signer() {
    let contract = MockRegistryContract::default();
    contract.set_nonce(owner(), 4);
    let controller = controller(contract);

    let op = controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap();
    assert_eq!(op.revoked, Some(true));
    assert_eq!(op.nonce, Some(4));
    assert_eq!(op.signer, OWNER);
    assert_eq!(op.revocation_key_path, key_path());

    let domain = controller.signing_domain().await.unwrap();
    let expected = status_change_typed_data(
        domain,
        SigningSchema::ChangeStatus,
        true,
        &key_location(),
        owner(),
        4,
    );
    assert_eq!(op.signature, MockSigner::expected_signature(&expected).to_hex());
}

#[tokio::test]
async fn signed_payload_schemas_follow_execution_path() {
    let controller = controller(MockRegistryContract::default());
    controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap();
    controller
        .generate_change_status_delegated_signed_payload(true, &key_path())
        .await
        .unwrap();
    let schemas: Vec<SigningSchema> = controller
        .signer()
        .unwrap()
        .signed()
        .iter()
        .map(|t| t.schema)
        .collect();
    assert_eq!(
        schemas,
        vec![SigningSchema::ChangeStatus, SigningSchema::ChangeStatusDelegated]
    );
}

#[tokio::test]
async fn signed_operation_with_current_nonce_is_forwarded() {
    let controller = controller(MockRegistryContract::default());
    let op = controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap();
    assert_eq!(op.nonce, Some(0));

    controller.change_status_signed(&op).await.unwrap();
    let writes = mock(&controller).writes();
    assert!(matches!(
        writes.as_slice(),
        [RecordedCall::ChangeStatusSigned {
            revoked: true,
            delegated: false,
            ..
        }]
    ));
    if let RecordedCall::ChangeStatusSigned { signer, signature, key, .. } = &writes[0] {
        assert_eq!(*signer, owner());
        assert_eq!(*key, key_location());
        assert_eq!(signature.len(), 33);
    }
}

#[tokio::test]
async fn signed_operation_replayed_after_nonce_advance_is_stale() {
    let controller = controller(MockRegistryContract::default());
    let op = controller
        .generate_change_status_signed_payload(false, &key_path())
        .await
        .unwrap();
    controller.change_status_signed(&op).await.unwrap();

    let err = controller.change_status_signed(&op).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::StaleNonce {
            expected: 0,
            current: 1
        }
    ));
    assert_eq!(mock(&controller).writes().len(), 1);
}

#[tokio::test]
async fn signed_delegated_operation_uses_delegated_entry_point() {
    let contract = MockRegistryContract::default();
    contract.set_nonce(owner(), 2);
    let controller = controller(contract);
    let op = controller
        .generate_change_status_delegated_signed_payload(true, &key_path())
        .await
        .unwrap();
    controller.change_status_delegated_signed(&op).await.unwrap();
    assert!(matches!(
        mock(&controller).writes().as_slice(),
        [RecordedCall::ChangeStatusSigned { delegated: true, .. }]
    ));
    assert_eq!(mock(&controller).nonce_of(&owner()), 3);
}

#[tokio::test]
async fn signed_operation_with_zero_nonce_is_valid() {
    let controller = unsigned_controller(MockRegistryContract::default());
    let op = revreg_core::SignedOperation {
        revoked: Some(true),
        revocation_key_path: key_path(),
        signer: OWNER.to_string(),
        signature: format!("0x{}", "ab".repeat(65)),
        nonce: Some(0),
    };
    controller.change_status_signed(&op).await.unwrap();
}

#[tokio::test]
async fn signed_operation_survives_json_relay() {
    let controller = controller(MockRegistryContract::default());
    let op = controller
        .generate_change_status_signed_payload(true, &key_path())
        .await
        .unwrap();
    let json = serde_json::to_string(&op).unwrap();
    assert!(json.contains("\"revocationKeyPath\""));
    let relayed: revreg_core::SignedOperation = serde_json::from_str(&json).unwrap();
    controller.change_status_signed(&relayed).await.unwrap();
}

// ── Signing domain ──────────────────────────────────────────────────

#[tokio::test]
async fn signing_domain_is_read_once() {
    let contract = MockRegistryContract::default()
        .with_version("2.1.0", 2)
        .with_chain_id(11_155_111);
    let controller = controller(contract);

    for _ in 0..3 {
        controller
            .generate_change_status_signed_payload(true, &key_path())
            .await
            .unwrap();
    }
    let domain = controller.signing_domain().await.unwrap();
    assert_eq!(domain.name, "Revocation Registry");
    assert_eq!(domain.version, "2.1.0");
    assert_eq!(domain.chain_id, 11_155_111);
    assert_eq!(domain.verifying_contract, mock(&controller).address());

    let mock = mock(&controller);
    assert_eq!(mock.count(|c| matches!(c, RecordedCall::Version)), 1);
    assert_eq!(mock.count(|c| matches!(c, RecordedCall::ChainId)), 1);
}

#[tokio::test]
async fn version_accessors_forward_to_contract() {
    let controller = controller(MockRegistryContract::default().with_version("3.0.1", 3));
    assert_eq!(controller.version().await.unwrap(), "3.0.1");
    assert_eq!(controller.version_major().await.unwrap(), 3);
}
