//! AWS client construction.
//!
//! Builds the DynamoDB and Application Auto Scaling clients from one shared
//! SDK config. Supports multiple credential sources:
//! - Environment variables
//! - AWS profiles
//! - Default credential chain (instance profile, etc.)

use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::config::Region;
use tracing::{debug, info};

/// Connection settings shared by every client of a run.
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    /// AWS region to export from.
    pub region: Option<String>,
    /// AWS profile name from ~/.aws/credentials.
    pub profile: Option<String>,
    /// Custom endpoint URL for local testing.
    pub endpoint_url: Option<String>,
}

/// The pair of SDK clients a run talks to.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub autoscaling: aws_sdk_applicationautoscaling::Client,
}

impl AwsClients {
    /// Build both clients for the given configuration.
    ///
    /// Region priority: explicit region > env/profile default > `us-east-1`.
    /// Credentials priority: profile > env/default chain.
    pub async fn connect(config: &AwsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;

        let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        let mut scaling_config = aws_sdk_applicationautoscaling::config::Builder::from(&sdk_config);

        if let Some(url) = &config.endpoint_url {
            debug!(endpoint = %url, "using custom endpoint");
            dynamo_config = dynamo_config.endpoint_url(url);
            scaling_config = scaling_config.endpoint_url(url);
        }

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_default();
        info!(region = %region, "connected to dynamodb");

        Self {
            dynamodb: aws_sdk_dynamodb::Client::from_conf(dynamo_config.build()),
            autoscaling: aws_sdk_applicationautoscaling::Client::from_conf(scaling_config.build()),
        }
    }
}

async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else("us-east-1");

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }
    // else: uses default credential chain (env vars, instance profile, etc)

    config_loader.load().await
}
