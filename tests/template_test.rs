use ci_build::context::DeployContext;
use ci_build::parameterize::parameterize;
use ci_build::template::Template;
use serde_json::{json, Value};

fn ctx() -> DeployContext {
    DeployContext::new("dev", "us-east-1", "svc")
}

fn documents() -> Vec<Value> {
    vec![
        json!({"Resources": {}}),
        json!({
            "Resources": {
                "ServerlessDeploymentBucket": {"Type": "AWS::S3::Bucket"},
                "ServerlessDeploymentBucketPolicy": {"Type": "AWS::S3::BucketPolicy"},
                "Queue": {"Properties": {"QueueName": "svc-dev-jobs", "Tags": [{"Key": "region", "Value": "us-east-1"}]}}
            },
            "Outputs": {"QueueArn": {"Export": {"Name": "svc-dev-QueueArn"}}}
        }),
        json!({
            "Resources": {
                "Fn": {"Properties": {
                    "Code": {"S3Key": "serverless/svc/dev/1588861425543-2020-05-07T14:23:45.543Z/svc.zip"},
                    "Environment": {"Variables": {"TABLE": {"Fn::Sub": "svc-dev-${AWS::Region}"}, "N": 3, "ON": true}}
                }}
            },
            "Parameters": {"Existing": {"Type": "Number"}}
        }),
    ]
}

#[test]
fn test_bucket_never_survives() {
    for document in documents() {
        let result = parameterize(document, &ctx()).unwrap();
        let resources = result.template.resources();
        assert!(!resources.contains_key("ServerlessDeploymentBucket"));
        assert!(!resources.contains_key("ServerlessDeploymentBucketPolicy"));
    }
}

#[test]
fn test_parameterize_is_idempotent() {
    for document in documents() {
        let once = parameterize(document, &ctx()).unwrap().template.to_json().unwrap();
        let twice = parameterize(serde_json::from_str(&once).unwrap(), &ctx())
            .unwrap()
            .template
            .to_json()
            .unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_output_reloads_as_template() {
    for document in documents() {
        let json = parameterize(document, &ctx()).unwrap().template.to_json().unwrap();
        let reloaded = Template::from_json(&json).unwrap();
        let params = reloaded.parameters().unwrap();
        for name in ["ServerlessDeploymentBucket", "Stage", "ArtifactPath"] {
            assert!(params.contains_key(name), "missing parameter {}", name);
        }
    }
}

#[test]
fn test_untouched_document_keeps_shape() {
    let document = json!({"Resources": {"A": {"Properties": {"Name": "static", "Count": 2}}}});
    let result = parameterize(document.clone(), &ctx()).unwrap();
    assert_eq!(result.template.into_value()["Resources"], document["Resources"]);
}

#[test]
fn test_sub_key_preserved() {
    let document = documents().remove(2);
    let value = parameterize(document, &ctx()).unwrap().template.into_value();
    assert_eq!(
        value["Resources"]["Fn"]["Properties"]["Environment"]["Variables"],
        json!({"TABLE": {"Fn::Sub": "svc-${Stage}-${AWS::Region}"}, "N": 3, "ON": true})
    );
    assert_eq!(value["Parameters"]["Existing"], json!({"Type": "Number"}));
}
