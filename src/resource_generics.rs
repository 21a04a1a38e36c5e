use k8s_openapi::{apimachinery::pkg::apis::meta::v1::OwnerReference, NamespaceResourceScope};
use kube::{
    api::{ObjectMeta, Patch, PatchParams},
    client::Client,
    Api, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info};

use crate::constants;

/// Returns the live object, or an empty one carrying only `name` and `namespace` when it does
/// not exist yet
pub async fn get_or_empty<K>(client: Client, name: &str, namespace: &str) -> Result<K, kube::Error>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + Debug + DeserializeOwned + Default,
{
    let api: Api<K> = Api::namespaced(client, namespace);
    match api.get_opt(name).await? {
        Some(resource) => Ok(resource),
        None => {
            debug!("{} {name} not found in namespace {namespace}, rendering from scratch", K::kind(&()));
            let mut resource = K::default();
            *resource.meta_mut() = ObjectMeta {
                name: Some(name.to_owned()),
                namespace: Some(namespace.to_owned()),
                ..ObjectMeta::default()
            };
            Ok(resource)
        }
    }
}

/// Makes `owner` the owner of `resource`, replacing a previous reference with the same uid and
/// keeping references to other owners
pub fn set_owner_reference<K: Resource>(resource: &mut K, owner: OwnerReference) {
    let owner_references = resource.meta_mut().owner_references.get_or_insert_with(Vec::new);
    owner_references.retain(|reference| reference.uid != owner.uid);
    owner_references.push(owner);
}

/// Server side applies `resource` as the reconciler's field manager
pub async fn apply<K>(client: Client, resource: &K) -> Result<K, kube::Error>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned,
{
    let name = resource.name_any();
    let namespace = resource.namespace().unwrap_or_default();
    let api: Api<K> = Api::namespaced(client, &namespace);

    // The API server refuses apply patches that carry managed fields
    let mut desired = resource.clone();
    desired.meta_mut().managed_fields = None;

    let applied = api
        .patch(&name, &PatchParams::apply(constants::FIELD_MANAGER).force(), &Patch::Apply(&desired))
        .await?;
    info!("{} {name} applied in namespace {namespace}", K::kind(&()));
    Ok(applied)
}
