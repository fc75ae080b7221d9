//! Property tests for the deployment name codec.

use fabrik_fleet::{
    decode_deployment_name, decode_task_id, deployment_name_regex, encode_deployment_name,
    encode_task_id, DeploymentNameCodec,
};
use fabrik_types::DEFAULT_DEPLOYMENT_PREFIX;
use proptest::prelude::*;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_guid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_subnet() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z][a-z0-9-]{0,12}")
}

proptest! {
    /// Decoding an encoded name gives back the same identity.
    #[test]
    fn deployment_name_round_trips(
        subnet in arb_subnet(),
        index in any::<u32>(),
        guid in arb_guid(),
    ) {
        let name = encode_deployment_name(DEFAULT_DEPLOYMENT_PREFIX, subnet.as_deref(), index, &guid);
        let decoded = decode_deployment_name(&name, subnet.as_deref()).unwrap();

        prop_assert_eq!(decoded.prefix.as_str(), DEFAULT_DEPLOYMENT_PREFIX);
        prop_assert_eq!(decoded.subnet.as_deref(), subnet.as_deref());
        prop_assert_eq!(decoded.network_index, index);
        prop_assert_eq!(decoded.instance_guid, guid);
        prop_assert_eq!(decoded.to_string(), name);
    }

    /// Custom prefixes round-trip through a bound codec.
    #[test]
    fn codec_round_trips_custom_prefix(
        prefix in "[a-z][a-z-]{0,10}[a-z]",
        subnet in arb_subnet(),
        index in 0u32..10_000,
        guid in arb_guid(),
    ) {
        let codec = DeploymentNameCodec::new(prefix.clone(), subnet.as_deref());
        let decoded = codec.decode(&codec.encode(index, &guid)).unwrap();
        prop_assert_eq!(decoded.prefix, prefix);
        prop_assert_eq!(decoded.network_index, index);
        prop_assert_eq!(decoded.instance_guid, guid);
    }

    /// The task id is always the last numeric segment.
    #[test]
    fn task_id_round_trips(
        subnet in arb_subnet(),
        index in any::<u32>(),
        guid in arb_guid(),
        task_id in any::<u64>(),
    ) {
        let deployment = encode_deployment_name(DEFAULT_DEPLOYMENT_PREFIX, subnet.as_deref(), index, &guid);
        let task = decode_task_id(&encode_task_id(&deployment, task_id)).unwrap();
        prop_assert_eq!(task.deployment_name, deployment);
        prop_assert_eq!(task.task_id, task_id);
    }
}

#[test]
fn subnet_less_name_gives_bare_prefix_for_missing_or_empty_subnet() {
    let name = "service-fabrik-1234-5432abcd-1098-abcd-7654-3210abcd9876";
    for subnet in [None, Some("")] {
        let caps = deployment_name_regex(subnet).captures(name).unwrap();
        assert_eq!(&caps[1], "service-fabrik");
    }
}
