//! # Registry ABI
//!
//! Function and event declarations of the deployed registry, generated with
//! alloy's `sol!`. Each function yields a `<name>Call` type whose
//! `SolCall::abi_encode` produces calldata and whose `abi_decode_returns`
//! reads the `eth_call` result. Events yield their topic-0 as
//! `SolEvent::SIGNATURE_HASH`.
//!
//! Only the surface the controller drives is declared.

use alloy_sol_types::sol;

sol! {
    function isRevoked(address namespace, bytes32 revocationList, bytes32 revocationKey) external view returns (bool);
    function nonces(address signer) external view returns (uint256);
    function version() external view returns (string);
    function VERSION_MAJOR() external view returns (uint8);

    function changeStatus(bool revoked, address namespace, bytes32 revocationList, bytes32 revocationKey) external;
    function changeStatusDelegated(bool revoked, address namespace, bytes32 revocationList, bytes32 revocationKey) external;
    function changeStatusSigned(bool revoked, address namespace, bytes32 revocationList, bytes32 revocationKey, address signer, bytes calldata signature) external;
    function changeStatusDelegatedSigned(bool revoked, address namespace, bytes32 revocationList, bytes32 revocationKey, address signer, bytes calldata signature) external;
    function changeStatusesInList(bool[] memory revoked, address namespace, bytes32 revocationList, bytes32[] memory revocationKeys) external;
    function changeStatusesInListDelegated(bool[] memory revoked, address namespace, bytes32 revocationList, bytes32[] memory revocationKeys) external;

    function changeListOwner(address namespace, address newOwner, bytes32 revocationList) external;
    function addListDelegate(address namespace, address delegate, bytes32 revocationList, uint256 validity) external;
    function removeListDelegate(address namespace, address delegate, bytes32 revocationList) external;

    event RevocationListStatusChanged(address indexed namespace, bytes32 indexed revocationList, bool revoked);
    event RevocationStatusChanged(address indexed namespace, bytes32 indexed revocationList, bytes32 indexed revocationKey, bool revoked);
}
